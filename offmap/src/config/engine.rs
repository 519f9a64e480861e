//! Validated runtime configuration for the sync engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ConfigError;
use super::file::ConfigFile;
use crate::coord::BoundingBox;
use crate::poi::{DEFAULT_POI_ENDPOINT, DEFAULT_QUERY_TIMEOUT_SECS};
use crate::provider::DEFAULT_TILE_SERVER;
use crate::tile::{DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_DELAY, MIN_REQUEST_DELAY};

/// Everything [`crate::sync::SyncEngine`] needs, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub bbox: BoundingBox,
    pub zoom_levels: Vec<u8>,
    /// Holds `tiles/` and `attractions/`.
    pub data_dir: PathBuf,
    pub tile_server: String,
    pub request_delay: Duration,
    pub max_attempts: u32,
    pub tile_timeout_secs: u64,
    pub poi_endpoint: String,
    pub poi_timeout_secs: u32,
    pub include_food_and_drink: bool,
    pub hide_food_and_drink: bool,
    pub user_agent: String,
}

impl EngineConfig {
    /// Engine settings for an area with every other value at its default.
    pub fn new(bbox: BoundingBox, zoom_levels: Vec<u8>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bbox,
            zoom_levels,
            data_dir: data_dir.into(),
            tile_server: DEFAULT_TILE_SERVER.to_string(),
            request_delay: DEFAULT_REQUEST_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tile_timeout_secs: 30,
            poi_endpoint: DEFAULT_POI_ENDPOINT.to_string(),
            poi_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            include_food_and_drink: false,
            hide_food_and_drink: true,
            user_agent: crate::user_agent(),
        }
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.data_dir.join("tiles")
    }

    pub fn attractions_dir(&self) -> PathBuf {
        self.data_dir.join("attractions")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl ConfigFile {
    /// Validates the file settings into an [`EngineConfig`].
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let area = &self.area;
        let bbox = BoundingBox::new(area.north, area.south, area.east, area.west)?;

        if area.zoom_levels.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "area.zoom_levels".to_string(),
                value: String::new(),
                reason: "at least one zoom level is required".to_string(),
            });
        }

        let request_delay = Duration::from_millis(self.tiles.delay_ms);
        if request_delay < MIN_REQUEST_DELAY {
            return Err(ConfigError::InvalidValue {
                key: "tiles.delay_ms".to_string(),
                value: self.tiles.delay_ms.to_string(),
                reason: format!("must be at least {}", MIN_REQUEST_DELAY.as_millis()),
            });
        }

        Ok(EngineConfig {
            tile_server: self.tiles.server_url.clone(),
            request_delay,
            max_attempts: self.tiles.max_attempts.max(1),
            tile_timeout_secs: self.tiles.timeout_secs,
            poi_endpoint: self.poi.endpoint.clone(),
            poi_timeout_secs: self.poi.timeout_secs,
            include_food_and_drink: self.poi.include_food_and_drink,
            hide_food_and_drink: self.poi.hide_food_and_drink,
            ..EngineConfig::new(bbox, area.zoom_levels.clone(), &self.storage.data_dir)
        })
    }
}
