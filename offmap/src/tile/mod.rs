//! Offline tile pyramid.
//!
//! ```text
//! PyramidDownloader ──► TileFetcher ──► HttpClient
//!        │                   │
//!        │                   └──► TileStore  (tiles/{zoom}/{x}/{y}.png)
//!        └──► DownloadControl (pause / resume / cancel)
//! ```

mod control;
mod downloader;
mod error;
mod fetcher;
mod progress;
mod store;

pub use control::{Checkpoint, DownloadControl, DownloadState};
pub use downloader::{
    PyramidDownloader, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_DELAY, MIN_REQUEST_DELAY,
};
pub use error::{TileError, TileSyncError};
pub use fetcher::{FetchOutcome, TileFetcher};
pub use progress::{DownloadProgress, TileReport};
pub use store::{StoreStats, TileStore};
