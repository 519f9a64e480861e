//! Sync orchestration.
//!
//! [`SyncEngine`] runs the tile pyramid download to its end and then, unless it
//! was cancelled or failed, replaces the attraction catalog from a single POI
//! query. It is the one handle UI collaborators talk to.

mod collaborators;
mod engine;
mod error;
mod report;

pub use collaborators::{
    attraction_prompt, describe_attraction, FixedLocation, LocationProvider, NearbyAttraction,
    ResponseGenerator,
};
pub use engine::SyncEngine;
pub use error::SyncError;
pub use report::{SyncOutcome, SyncReport};
