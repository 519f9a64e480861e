//! Sync command - download the configured area.
//!
//! The engine runs on a blocking task while this thread renders its progress
//! channels. Ctrl+C cancels the tile stage; tiles already written are kept.

use std::sync::Arc;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use offmap::config::format_size;
use offmap::poi::{PoiPhase, PoiProgress};
use offmap::sync::{SyncEngine, SyncOutcome, SyncReport};
use offmap::tile::DownloadProgress;

use crate::error::CliError;
use crate::runner::CliRunner;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles {msg}";

/// Run the sync command.
pub fn run() -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("sync");
    let engine = runner.engine()?;
    engine.initialize()?;

    let config = engine.config();
    println!("Offmap Sync v{}", offmap::VERSION);
    println!("================");
    println!();
    println!("Area:        {}", config.bbox);
    println!("Zoom levels: {:?}", config.zoom_levels);
    println!(
        "Tiles:       {} ({} not yet downloaded)",
        engine.total_tiles(),
        engine.missing_tiles()
    );
    println!("Tile server: {}", config.tile_server);
    println!();
    println!("Press Ctrl+C to cancel");
    println!();

    let cancel_engine = Arc::clone(&engine);
    ctrlc::set_handler(move || {
        if cancel_engine.cancel() {
            eprintln!();
            eprintln!("Cancelling after the current tile...");
        }
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let report = drive(engine.clone())?;
    print_summary(&engine, &report);

    match report.outcome {
        SyncOutcome::Completed => Ok(()),
        other => Err(CliError::SyncFailed(other.to_string())),
    }
}

/// Runs `sync_all` and renders progress until it returns.
fn drive(engine: Arc<SyncEngine>) -> Result<SyncReport, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| CliError::Config(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async move {
        let mut tiles = engine.subscribe_tile_progress();
        let mut pois = engine.subscribe_poi_progress();

        let bar = ProgressBar::new(engine.total_tiles());
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let worker_engine = Arc::clone(&engine);
        let mut worker = tokio::task::spawn_blocking(move || worker_engine.sync_all());

        let joined = loop {
            tokio::select! {
                joined = &mut worker => break joined,
                Ok(()) = tiles.changed() => render_tiles(&bar, &tiles.borrow_and_update()),
                Ok(()) = pois.changed() => render_pois(&bar, &pois.borrow_and_update()),
            }
        };

        render_tiles(&bar, &engine.tile_progress());
        render_pois(&bar, &engine.poi_progress());
        bar.finish();

        joined.map_err(|e| CliError::SyncFailed(format!("sync worker stopped: {}", e)))
    })
}

fn render_tiles(bar: &ProgressBar, progress: &DownloadProgress) {
    bar.set_length(progress.total_units);
    bar.set_position(progress.completed_units);
    if progress.failed_units > 0 {
        bar.set_message(format!("({} failed)", progress.failed_units));
    }
}

fn render_pois(bar: &ProgressBar, progress: &PoiProgress) {
    let message = match progress.phase {
        PoiPhase::Idle => return,
        PoiPhase::Querying => "querying attractions...".to_string(),
        PoiPhase::Classifying => format!("classifying {} features...", progress.received),
        PoiPhase::Storing => format!("storing {} attractions...", progress.kept),
        PoiPhase::Completed => format!("{} attractions", progress.kept),
        PoiPhase::Failed => "attraction query failed".to_string(),
    };
    bar.set_message(message);
}

fn print_summary(engine: &SyncEngine, report: &SyncReport) {
    let tiles = &report.tiles;

    println!();
    println!("Sync Summary");
    println!("────────────");
    println!(
        "  Tiles:       {} downloaded, {} already stored, {} failed",
        tiles.downloaded, tiles.cached, tiles.failed
    );
    if let Ok(stats) = engine.tile_stats() {
        println!("  Tile store:  {} files, {}", stats.files, format_size(stats.bytes));
    }
    println!("  Attractions: {}", report.attractions);

    let status = match &report.outcome {
        SyncOutcome::Completed if tiles.failed == 0 => style("complete").green(),
        SyncOutcome::Completed => style("complete, some tiles missing").yellow(),
        SyncOutcome::Cancelled => style("cancelled").yellow(),
        _ => style("failed").red(),
    };
    println!("  Status:      {}", status);
    if tiles.failed > 0 {
        println!();
        println!("Run 'offmap sync' again to retry the missing tiles.");
    }
}
