//! INI-backed user configuration.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;

use super::error::ConfigError;
use crate::coord::MAX_ZOOM;
use crate::poi::{DEFAULT_POI_ENDPOINT, DEFAULT_QUERY_TIMEOUT_SECS};
use crate::provider::DEFAULT_TILE_SERVER;
use crate::tile::{DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_DELAY};

/// Directory holding the config file, `~/.offmap`.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".offmap")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.ini")
}

/// Expands a leading `~/` to the home directory.
fn expand_tilde(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}

/// Formats a byte count for humans, e.g. `1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// `[area]`: the region to make available offline.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSettings {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub zoom_levels: Vec<u8>,
}

impl Default for AreaSettings {
    /// Central Paris at city-level zooms.
    fn default() -> Self {
        Self {
            north: 48.90,
            south: 48.82,
            east: 2.42,
            west: 2.25,
            zoom_levels: vec![12, 13, 14],
        }
    }
}

/// `[tiles]`
#[derive(Debug, Clone, PartialEq)]
pub struct TileSettings {
    pub server_url: String,
    /// Politeness delay between tile requests.
    pub delay_ms: u64,
    /// Attempts per tile per sync.
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_TILE_SERVER.to_string(),
            delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout_secs: 30,
        }
    }
}

/// `[poi]`
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSettings {
    pub endpoint: String,
    pub timeout_secs: u32,
    /// Query named restaurants and cafés too.
    pub include_food_and_drink: bool,
    /// Leave Food & Drink out of the general attraction listing.
    pub hide_food_and_drink: bool,
}

impl Default for PoiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_POI_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            include_food_and_drink: false,
            hide_food_and_drink: true,
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: config_dir().join("data"),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: config_dir().join("logs"),
        }
    }
}

/// The whole config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub area: AreaSettings,
    pub tiles: TileSettings,
    pub poi: PoiSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads `~/.offmap/config.ini`, or defaults if it does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads a config file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Saves to `~/.offmap/config.ini`.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let zoom_levels = match lookup(ini, "area", "zoom_levels") {
            Some(value) => parse_zoom_levels(value)?,
            None => defaults.area.zoom_levels.clone(),
        };

        Ok(Self {
            area: AreaSettings {
                north: parse(ini, "area", "north", defaults.area.north)?,
                south: parse(ini, "area", "south", defaults.area.south)?,
                east: parse(ini, "area", "east", defaults.area.east)?,
                west: parse(ini, "area", "west", defaults.area.west)?,
                zoom_levels,
            },
            tiles: TileSettings {
                server_url: string(ini, "tiles", "server_url", &defaults.tiles.server_url),
                delay_ms: parse(ini, "tiles", "delay_ms", defaults.tiles.delay_ms)?,
                max_attempts: parse_positive(ini, "tiles", "max_attempts", defaults.tiles.max_attempts)?,
                timeout_secs: parse(ini, "tiles", "timeout_secs", defaults.tiles.timeout_secs)?,
            },
            poi: PoiSettings {
                endpoint: string(ini, "poi", "endpoint", &defaults.poi.endpoint),
                timeout_secs: parse(ini, "poi", "timeout_secs", defaults.poi.timeout_secs)?,
                include_food_and_drink: parse_bool_key(
                    ini,
                    "poi",
                    "include_food_and_drink",
                    defaults.poi.include_food_and_drink,
                )?,
                hide_food_and_drink: parse_bool_key(
                    ini,
                    "poi",
                    "hide_food_and_drink",
                    defaults.poi.hide_food_and_drink,
                )?,
            },
            storage: StorageSettings {
                data_dir: lookup(ini, "storage", "data_dir")
                    .map(expand_tilde)
                    .unwrap_or(defaults.storage.data_dir),
            },
            logging: LoggingSettings {
                level: string(ini, "logging", "level", &defaults.logging.level),
                directory: lookup(ini, "logging", "directory")
                    .map(expand_tilde)
                    .unwrap_or(defaults.logging.directory),
            },
        })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("area"))
            .set("north", self.area.north.to_string())
            .set("south", self.area.south.to_string())
            .set("east", self.area.east.to_string())
            .set("west", self.area.west.to_string())
            .set("zoom_levels", format_zoom_levels(&self.area.zoom_levels));
        ini.with_section(Some("tiles"))
            .set("server_url", self.tiles.server_url.as_str())
            .set("delay_ms", self.tiles.delay_ms.to_string())
            .set("max_attempts", self.tiles.max_attempts.to_string())
            .set("timeout_secs", self.tiles.timeout_secs.to_string());
        ini.with_section(Some("poi"))
            .set("endpoint", self.poi.endpoint.as_str())
            .set("timeout_secs", self.poi.timeout_secs.to_string())
            .set(
                "include_food_and_drink",
                self.poi.include_food_and_drink.to_string(),
            )
            .set("hide_food_and_drink", self.poi.hide_food_and_drink.to_string());
        ini.with_section(Some("storage"))
            .set("data_dir", self.storage.data_dir.to_string_lossy().into_owned());
        ini.with_section(Some("logging"))
            .set("level", self.logging.level.as_str())
            .set("directory", self.logging.directory.to_string_lossy().into_owned());
        ini
    }
}

fn lookup<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.section(Some(section))
        .and_then(|props| props.get(key))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn string(ini: &Ini, section: &str, key: &str, default: &str) -> String {
    lookup(ini, section, key).unwrap_or(default).to_string()
}

fn parse<T>(ini: &Ini, section: &str, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(ini, section, key) {
        Some(value) => value
            .parse()
            .map_err(|e: T::Err| invalid(section, key, value, e.to_string())),
        None => Ok(default),
    }
}

fn parse_positive(ini: &Ini, section: &str, key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = parse(ini, section, key, default)?;
    if value == 0 {
        return Err(invalid(section, key, "0", "must be at least 1".to_string()));
    }
    Ok(value)
}

fn parse_bool_key(ini: &Ini, section: &str, key: &str, default: bool) -> Result<bool, ConfigError> {
    match lookup(ini, section, key) {
        Some(value) => parse_bool(value)
            .ok_or_else(|| invalid(section, key, value, "expected true or false".to_string())),
        None => Ok(default),
    }
}

pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parses `"12, 13,14"` into sorted, deduplicated zoom levels.
pub(super) fn parse_zoom_levels(value: &str) -> Result<Vec<u8>, ConfigError> {
    let err = |reason: String| invalid("area", "zoom_levels", value, reason);

    let mut zooms = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|e| err(format!("'{}': {}", s, e)))
                .and_then(|z| {
                    if z > MAX_ZOOM {
                        Err(err(format!("zoom {} exceeds {}", z, MAX_ZOOM)))
                    } else {
                        Ok(z)
                    }
                })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if zooms.is_empty() {
        return Err(err("at least one zoom level is required".to_string()));
    }
    zooms.sort_unstable();
    zooms.dedup();
    Ok(zooms)
}

pub(super) fn format_zoom_levels(zooms: &[u8]) -> String {
    zooms
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(super) fn invalid(section: &str, key: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{}.{}", section, key),
        value: value.to_string(),
        reason,
    }
}
