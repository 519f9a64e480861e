//! Tile stage error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::coord::TileCoordinate;
use crate::provider::ProviderError;

/// Errors from fetching or storing a single tile.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile could not be downloaded. Transient: the tile stays absent and
    /// is retried on a later sync.
    #[error("failed to fetch tile {tile}: {source}")]
    Network {
        tile: TileCoordinate,
        #[source]
        source: ProviderError,
    },

    /// A tile directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A tile file could not be written or moved into place.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tile directory could not be read or removed.
    #[error("failed to access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TileError {
    /// Network failures are absorbed by the downloader; storage failures are
    /// fatal to the session.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Errors that end a tile download session.
#[derive(Debug, Error)]
pub enum TileSyncError {
    /// Another session is downloading or paused.
    #[error("a tile download is already in progress")]
    AlreadyRunning,

    /// The tile store failed; nothing more can be written.
    #[error(transparent)]
    Storage(#[from] TileError),
}
