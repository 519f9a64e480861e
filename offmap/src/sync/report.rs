//! Aggregate sync result.

use std::fmt;

use serde::Serialize;

use crate::tile::TileReport;

/// How a sync session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Both stages completed. Individual tiles may still have failed; see
    /// [`TileReport::failed`].
    Completed,
    /// The tile stage was cancelled; POIs were not synced.
    Cancelled,
    /// The tile stage hit a fatal error; POIs were not synced.
    TilesFailed(String),
    /// Tiles completed but the POI stage failed. The previous catalog is
    /// unchanged.
    PoiFailed(String),
    /// Another session was running; nothing was done.
    AlreadyRunning,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::TilesFailed(reason) => write!(f, "tile sync failed: {}", reason),
            Self::PoiFailed(reason) => write!(f, "POI sync failed: {}", reason),
            Self::AlreadyRunning => f.write_str("a sync is already in progress"),
        }
    }
}

/// Result of [`super::SyncEngine::sync_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub tiles: TileReport,
    /// Attractions stored by this session; zero unless the POI stage ran.
    pub attractions: usize,
}

impl SyncReport {
    pub(crate) fn new(outcome: SyncOutcome, tiles: TileReport) -> Self {
        Self {
            outcome,
            tiles,
            attractions: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == SyncOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(SyncOutcome::PoiFailed("HTTP 429".to_string())).unwrap();
        assert_eq!(json["outcome"], "poiFailed");
        assert_eq!(json["reason"], "HTTP 429");
    }

    #[test]
    fn test_display_names_stage() {
        assert_eq!(
            SyncOutcome::TilesFailed("disk full".to_string()).to_string(),
            "tile sync failed: disk full"
        );
    }
}
