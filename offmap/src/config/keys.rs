//! Addressable configuration keys for `config get/set/list`.

use std::str::FromStr;

use super::error::ConfigError;
use super::file::{format_zoom_levels, invalid, parse_bool, parse_zoom_levels, ConfigFile};
use crate::tile::MIN_REQUEST_DELAY;

/// Every user-settable key, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    AreaNorth,
    AreaSouth,
    AreaEast,
    AreaWest,
    AreaZoomLevels,
    TilesServerUrl,
    TilesDelayMs,
    TilesMaxAttempts,
    TilesTimeoutSecs,
    PoiEndpoint,
    PoiTimeoutSecs,
    PoiIncludeFoodAndDrink,
    PoiHideFoodAndDrink,
    StorageDataDir,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 16] = [
    ConfigKey::AreaNorth,
    ConfigKey::AreaSouth,
    ConfigKey::AreaEast,
    ConfigKey::AreaWest,
    ConfigKey::AreaZoomLevels,
    ConfigKey::TilesServerUrl,
    ConfigKey::TilesDelayMs,
    ConfigKey::TilesMaxAttempts,
    ConfigKey::TilesTimeoutSecs,
    ConfigKey::PoiEndpoint,
    ConfigKey::PoiTimeoutSecs,
    ConfigKey::PoiIncludeFoodAndDrink,
    ConfigKey::PoiHideFoodAndDrink,
    ConfigKey::StorageDataDir,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full name, `section.key`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    pub fn section(&self) -> &'static str {
        match self {
            Self::AreaNorth
            | Self::AreaSouth
            | Self::AreaEast
            | Self::AreaWest
            | Self::AreaZoomLevels => "area",
            Self::TilesServerUrl
            | Self::TilesDelayMs
            | Self::TilesMaxAttempts
            | Self::TilesTimeoutSecs => "tiles",
            Self::PoiEndpoint
            | Self::PoiTimeoutSecs
            | Self::PoiIncludeFoodAndDrink
            | Self::PoiHideFoodAndDrink => "poi",
            Self::StorageDataDir => "storage",
            Self::LoggingLevel | Self::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            Self::AreaNorth => "north",
            Self::AreaSouth => "south",
            Self::AreaEast => "east",
            Self::AreaWest => "west",
            Self::AreaZoomLevels => "zoom_levels",
            Self::TilesServerUrl => "server_url",
            Self::TilesDelayMs => "delay_ms",
            Self::TilesMaxAttempts => "max_attempts",
            Self::TilesTimeoutSecs | Self::PoiTimeoutSecs => "timeout_secs",
            Self::PoiEndpoint => "endpoint",
            Self::PoiIncludeFoodAndDrink => "include_food_and_drink",
            Self::PoiHideFoodAndDrink => "hide_food_and_drink",
            Self::StorageDataDir => "data_dir",
            Self::LoggingLevel => "level",
            Self::LoggingDirectory => "directory",
        }
    }

    /// Current value as a display string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::AreaNorth => config.area.north.to_string(),
            Self::AreaSouth => config.area.south.to_string(),
            Self::AreaEast => config.area.east.to_string(),
            Self::AreaWest => config.area.west.to_string(),
            Self::AreaZoomLevels => format_zoom_levels(&config.area.zoom_levels),
            Self::TilesServerUrl => config.tiles.server_url.clone(),
            Self::TilesDelayMs => config.tiles.delay_ms.to_string(),
            Self::TilesMaxAttempts => config.tiles.max_attempts.to_string(),
            Self::TilesTimeoutSecs => config.tiles.timeout_secs.to_string(),
            Self::PoiEndpoint => config.poi.endpoint.clone(),
            Self::PoiTimeoutSecs => config.poi.timeout_secs.to_string(),
            Self::PoiIncludeFoodAndDrink => config.poi.include_food_and_drink.to_string(),
            Self::PoiHideFoodAndDrink => config.poi.hide_food_and_drink.to_string(),
            Self::StorageDataDir => config.storage.data_dir.display().to_string(),
            Self::LoggingLevel => config.logging.level.clone(),
            Self::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Parses and stores `value`. The config is left unchanged on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            Self::AreaNorth => config.area.north = self.parse(value)?,
            Self::AreaSouth => config.area.south = self.parse(value)?,
            Self::AreaEast => config.area.east = self.parse(value)?,
            Self::AreaWest => config.area.west = self.parse(value)?,
            Self::AreaZoomLevels => config.area.zoom_levels = parse_zoom_levels(value)?,
            Self::TilesServerUrl => config.tiles.server_url = self.non_empty(value)?,
            Self::TilesDelayMs => {
                let delay_ms: u64 = self.parse(value)?;
                if u128::from(delay_ms) < MIN_REQUEST_DELAY.as_millis() {
                    return Err(self.invalid(
                        value,
                        &format!("must be at least {}", MIN_REQUEST_DELAY.as_millis()),
                    ));
                }
                config.tiles.delay_ms = delay_ms;
            }
            Self::TilesMaxAttempts => {
                let attempts: u32 = self.parse(value)?;
                if attempts == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.tiles.max_attempts = attempts;
            }
            Self::TilesTimeoutSecs => config.tiles.timeout_secs = self.parse(value)?,
            Self::PoiEndpoint => config.poi.endpoint = self.non_empty(value)?,
            Self::PoiTimeoutSecs => config.poi.timeout_secs = self.parse(value)?,
            Self::PoiIncludeFoodAndDrink => config.poi.include_food_and_drink = self.boolean(value)?,
            Self::PoiHideFoodAndDrink => config.poi.hide_food_and_drink = self.boolean(value)?,
            Self::StorageDataDir => config.storage.data_dir = self.non_empty(value)?.into(),
            Self::LoggingLevel => config.logging.level = self.non_empty(value)?,
            Self::LoggingDirectory => config.logging.directory = self.non_empty(value)?.into(),
        }
        Ok(())
    }

    fn parse<T>(&self, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|e: T::Err| self.invalid(value, &e.to_string()))
    }

    fn boolean(&self, value: &str) -> Result<bool, ConfigError> {
        parse_bool(value).ok_or_else(|| self.invalid(value, "expected true or false"))
    }

    fn non_empty(&self, value: &str) -> Result<String, ConfigError> {
        if value.is_empty() {
            return Err(self.invalid(value, "must not be empty"));
        }
        Ok(value.to_string())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        invalid(self.section(), self.key_name(), value, reason.to_string())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == needle)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
