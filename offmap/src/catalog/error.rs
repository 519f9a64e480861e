use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Catalog write failures. Reads never fail; see [`super::CatalogStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create catalog directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}
