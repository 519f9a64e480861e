//! Provider error types.

use thiserror::Error;

/// Errors raised by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered with something other than 200 OK.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// The HTTP client itself could not be built.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),
}

impl ProviderError {
    /// Returns the HTTP status if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
