//! Configuration.
//!
//! User settings live in an INI file at `~/.offmap/config.ini`:
//!
//! ```ini
//! [area]
//! north = 48.90
//! south = 48.82
//! east = 2.42
//! west = 2.25
//! zoom_levels = 12,13,14
//!
//! [tiles]
//! server_url = https://tile.openstreetmap.org
//! delay_ms = 1000
//! max_attempts = 2
//! timeout_secs = 30
//!
//! [poi]
//! endpoint = https://overpass-api.de/api/interpreter
//! timeout_secs = 60
//! include_food_and_drink = false
//! hide_food_and_drink = true
//!
//! [storage]
//! data_dir = ~/.offmap/data
//!
//! [logging]
//! level = info
//! directory = ~/.offmap/logs
//! ```
//!
//! Missing files and missing keys fall back to defaults. [`ConfigFile`] is
//! converted into the validated [`EngineConfig`] the engine runs on.

mod engine;
mod error;
mod file;
mod keys;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use file::{
    config_dir, config_file_path, format_size, AreaSettings, ConfigFile, LoggingSettings,
    PoiSettings, StorageSettings, TileSettings,
};
pub use keys::ConfigKey;
