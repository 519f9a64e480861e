//! Offmap - offline map tiles and points of interest
//!
//! Downloads the slippy-map tile pyramid for a bounding box and a catalog of
//! classified points of interest, so both are available without a network.
//!
//! ```ignore
//! use offmap::config::ConfigFile;
//! use offmap::sync::SyncEngine;
//!
//! let config = ConfigFile::load()?.to_engine_config()?;
//! let engine = SyncEngine::from_config(config)?;
//! let report = engine.sync_all();
//! println!("{}: {} attractions", report.outcome, report.attractions);
//! ```

pub mod atomic;
pub mod catalog;
pub mod config;
pub mod coord;
pub mod logging;
pub mod poi;
pub mod provider;
pub mod sync;
pub mod tile;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every request, `offmap/<version>`.
pub fn user_agent() -> String {
    format!("offmap/{}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_version() {
        assert_eq!(user_agent(), format!("offmap/{}", env!("CARGO_PKG_VERSION")));
    }
}
