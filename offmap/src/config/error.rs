use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::coord::CoordError;

/// Errors loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid sync area: {0}")]
    InvalidArea(#[from] CoordError),
}
