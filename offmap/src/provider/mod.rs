//! Network access to the tile server and the feature database.
//!
//! Everything goes through the [`HttpClient`] trait so tests can substitute a
//! mock and count requests.
//!
//! ```ignore
//! use std::sync::Arc;
//! use offmap::provider::{HttpClient, ReqwestClient, TileServer};
//!
//! let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::with_user_agent(
//!     offmap::user_agent(),
//!     30,
//! )?);
//! let server = TileServer::new("https://tile.openstreetmap.org");
//! ```

mod http;
mod tile_server;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use tile_server::{TileServer, DEFAULT_TILE_SERVER};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
