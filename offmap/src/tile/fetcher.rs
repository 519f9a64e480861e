//! Fetch-or-reuse of a single tile.

use std::sync::Arc;

use super::error::TileError;
use super::store::TileStore;
use crate::coord::TileCoordinate;
use crate::provider::{HttpClient, TileServer};

/// How a successful fetch was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The tile was already on disk; no request was made.
    Cached,
    /// The tile was downloaded and stored.
    Downloaded { bytes: usize },
}

/// Downloads tiles into a [`TileStore`], at most once per tile.
///
/// A stored tile is never requested again until the store is cleared. A
/// failed download leaves nothing on disk, so the tile is simply a cache miss
/// on the next attempt.
pub struct TileFetcher {
    store: TileStore,
    server: TileServer,
    client: Arc<dyn HttpClient>,
}

impl TileFetcher {
    pub fn new(store: TileStore, server: TileServer, client: Arc<dyn HttpClient>) -> Self {
        Self {
            store,
            server,
            client,
        }
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    /// Returns the tile from disk or downloads it.
    pub fn fetch(&self, tile: &TileCoordinate) -> Result<FetchOutcome, TileError> {
        if self.store.contains(tile) {
            tracing::trace!(tile = %tile, "Tile cache hit");
            return Ok(FetchOutcome::Cached);
        }

        let url = self.server.tile_url(tile);
        let data = self
            .client
            .get(&url)
            .map_err(|source| TileError::Network {
                tile: *tile,
                source,
            })?;

        self.store.write(tile, &data)?;
        tracing::debug!(tile = %tile, bytes = data.len(), "Tile downloaded");

        Ok(FetchOutcome::Downloaded { bytes: data.len() })
    }

    /// Convenience form returning only success or failure.
    pub fn fetch_tile(&self, x: u32, y: u32, zoom: u8) -> bool {
        match self.fetch(&TileCoordinate::new(zoom, x, y)) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Tile fetch failed");
                false
            }
        }
    }
}
