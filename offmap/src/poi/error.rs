//! POI stage errors.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that fail the POI stage as a whole.
///
/// POIs are fetched in a single batch; any of these leaves the previously
/// stored catalog in place.
#[derive(Debug, Error)]
pub enum PoiError {
    /// The query URL could not be built.
    #[error("invalid POI endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The feature database did not answer with 200 OK.
    #[error("POI query failed: {0}")]
    Service(#[from] ProviderError),

    /// The response body was not the expected JSON document.
    #[error("malformed POI response: {0}")]
    Malformed(String),
}
