//! Init command - create the configuration file and data directories.

use offmap::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();
    let existed = path.exists();

    // Write the config back so every key is present in the file.
    let config = ConfigFile::load()?;
    config.save()?;

    let runner = CliRunner::new()?;
    runner.log_startup("init");
    runner.engine()?.initialize()?;

    if existed {
        println!("Updated configuration file: {}", path.display());
    } else {
        println!("Created configuration file: {}", path.display());
    }
    println!("Data directory: {}", config.storage.data_dir.display());
    println!();
    println!(
        "Sync area: N {} S {} E {} W {}, zoom levels {:?}",
        config.area.north,
        config.area.south,
        config.area.east,
        config.area.west,
        config.area.zoom_levels
    );
    println!("Edit the file or use 'offmap config set' to change it, then run 'offmap sync'.");
    Ok(())
}
