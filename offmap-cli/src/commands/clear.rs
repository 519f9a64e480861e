//! Clear commands - delete stored data.

use clap::Subcommand;
use offmap::config::format_size;

use crate::error::CliError;
use crate::runner::CliRunner;

/// What to delete.
#[derive(Debug, Subcommand)]
pub enum ClearTarget {
    /// Delete every downloaded tile
    Tiles,
    /// Delete the attraction catalog
    Attractions,
}

/// Run a clear subcommand.
pub fn run(target: ClearTarget) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("clear");
    let engine = runner.engine()?;

    match target {
        ClearTarget::Tiles => {
            let stats = engine.clear_tiles()?;
            println!(
                "Deleted {} tiles, freed {}",
                stats.files,
                format_size(stats.bytes)
            );
        }
        ClearTarget::Attractions => {
            let removed = engine.clear_attractions()?;
            println!("Deleted {} catalog files", removed);
        }
    }
    Ok(())
}
