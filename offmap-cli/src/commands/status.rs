//! Status command - show what is stored for the configured area.

use offmap::config::format_size;
use offmap::poi::Category;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the status command.
pub fn run() -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    let engine = runner.engine()?;
    let config = engine.config();

    println!("Area:        {}", config.bbox);
    println!("Zoom levels: {:?}", config.zoom_levels);
    println!("Data:        {}", config.data_dir.display());
    println!();

    let total = engine.total_tiles();
    let missing = engine.missing_tiles();
    let stats = engine.tile_stats()?;
    println!("Tiles");
    println!("  Stored:  {} of {}", total - missing, total);
    println!("  On disk: {} files, {}", stats.files, format_size(stats.bytes));
    println!(
        "  Offline: {}",
        if engine.is_area_fully_downloaded() {
            "ready"
        } else {
            "incomplete"
        }
    );
    println!();

    println!("Attractions");
    match engine.catalog() {
        Some(catalog) => {
            println!("  Updated: {}", catalog.last_updated.format("%Y-%m-%d %H:%M UTC"));
            println!("  Total:   {}", catalog.total_count);
            for category in &catalog.categories {
                let count = catalog
                    .attractions
                    .iter()
                    .filter(|a| a.category == *category)
                    .count();
                let hidden = *category == Category::FoodAndDrink && config.hide_food_and_drink;
                println!(
                    "    {:<14} {}{}",
                    category.name(),
                    count,
                    if hidden { " (hidden from listing)" } else { "" }
                );
            }
        }
        None => println!("  None stored"),
    }
    Ok(())
}
