//! POI stage progress.

use std::fmt;

use serde::Serialize;

/// Where the POI stage currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PoiPhase {
    #[default]
    Idle,
    Querying,
    Classifying,
    Storing,
    Completed,
    Failed,
}

impl PoiPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for PoiPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Querying => "querying",
            Self::Classifying => "classifying",
            Self::Storing => "storing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Snapshot of POI stage progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiProgress {
    pub phase: PoiPhase,
    /// Raw features returned by the query.
    pub received: usize,
    /// Features that survived classification.
    pub kept: usize,
}

impl PoiProgress {
    pub fn phase(phase: PoiPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }

    /// The stage is a single request, so progress is all-or-nothing.
    pub fn fraction(&self) -> f64 {
        if self.phase == PoiPhase::Completed {
            1.0
        } else {
            0.0
        }
    }
}
