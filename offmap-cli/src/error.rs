//! CLI error type.

use std::fmt;

use offmap::config::ConfigError;
use offmap::logging::LoggingError;
use offmap::sync::SyncError;

/// Errors reported to the user before exiting non-zero.
#[derive(Debug)]
pub enum CliError {
    /// Bad configuration or arguments.
    Config(String),
    ConfigFile(ConfigError),
    Logging(LoggingError),
    Engine(SyncError),
    /// A sync ran but did not complete.
    SyncFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Engine(e) => write!(f, "{}", e),
            CliError::SyncFailed(msg) => write!(f, "Sync did not complete: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        CliError::Engine(e)
    }
}
