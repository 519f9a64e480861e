//! Shared setup for commands that touch the engine.

use std::sync::Arc;

use offmap::config::ConfigFile;
use offmap::logging::{init_logging, LoggingConfig, LoggingGuard};
use offmap::sync::SyncEngine;

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one CLI invocation.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: LoggingGuard,
}

impl CliRunner {
    /// Loads the config file and starts logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let log_guard = init_logging(&LoggingConfig {
            // Progress bars own the terminal; logs go to the file.
            console: false,
            ..LoggingConfig::from(&config.logging)
        })?;

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = offmap::VERSION,
            command,
            "offmap starting"
        );
    }

    /// Builds the engine for the configured area.
    pub fn engine(&self) -> Result<Arc<SyncEngine>, CliError> {
        let engine_config = self.config.to_engine_config()?;
        Ok(Arc::new(SyncEngine::from_config(engine_config)?))
    }
}
