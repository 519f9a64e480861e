use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::StoreError;
use crate::poi::PoiError;
use crate::provider::ProviderError;
use crate::tile::TileError;

/// Engine-level errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A sync session is in progress.
    #[error("a sync is already in progress")]
    Busy,

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ProviderError),

    #[error(transparent)]
    Tiles(#[from] TileError),

    #[error(transparent)]
    Poi(#[from] PoiError),

    #[error(transparent)]
    Catalog(#[from] StoreError),
}
