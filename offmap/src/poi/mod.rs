//! Points of interest.
//!
//! One composite query, classification into a closed taxonomy, and the
//! resulting [`Attraction`] records.
//!
//! ```text
//! PoiQueryClient::fetch ──► Vec<RawFeature> ──► classify_all ──► Vec<Attraction>
//! ```

mod attraction;
mod classify;
mod element;
mod error;
mod progress;
mod query;
mod taxonomy;

pub use attraction::{haversine_km, Attraction};
pub use classify::{classify, classify_all, format_address, parse_rating, to_attraction};
pub use element::{parse_response, RawFeature, Tags};
pub use error::PoiError;
pub use progress::{PoiPhase, PoiProgress};
pub use query::{build_query, PoiQueryClient, DEFAULT_POI_ENDPOINT, DEFAULT_QUERY_TIMEOUT_SECS};
pub use taxonomy::{Category, PoiType, UnknownCategory};
