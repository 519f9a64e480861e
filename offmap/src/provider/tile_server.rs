//! Slippy-map tile server endpoint.
//!
//! Tiles are addressed as `{server}/{zoom}/{x}/{y}.png`, the layout used by
//! OpenStreetMap and most compatible raster servers.

use crate::coord::TileCoordinate;

/// Default public tile server.
pub const DEFAULT_TILE_SERVER: &str = "https://tile.openstreetmap.org";

/// A raster tile server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileServer {
    base_url: String,
}

impl TileServer {
    /// Creates a server from a base URL. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for one tile.
    pub fn tile_url(&self, tile: &TileCoordinate) -> String {
        format!(
            "{}/{}/{}/{}.png",
            self.base_url, tile.zoom, tile.x, tile.y
        )
    }
}

impl Default for TileServer {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SERVER)
    }
}
