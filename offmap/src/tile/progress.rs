//! Tile download progress.

use serde::Serialize;

use super::control::DownloadState;

/// Snapshot of tile stage progress.
///
/// `completed_units` only counts tiles that are verifiably on disk, and never
/// decreases within a session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub state: DownloadState,
    pub total_units: u64,
    pub completed_units: u64,
    pub failed_units: u64,
}

impl DownloadProgress {
    /// Fresh progress for a session over `total_units` tiles.
    pub fn started(total_units: u64) -> Self {
        Self {
            state: DownloadState::Downloading,
            total_units,
            completed_units: 0,
            failed_units: 0,
        }
    }

    /// Completed fraction in `[0, 1]`. An empty session counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total_units == 0 {
            return if self.state == DownloadState::Completed {
                1.0
            } else {
                0.0
            };
        }
        self.completed_units as f64 / self.total_units as f64
    }

    /// Completed percentage, rounded down.
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).floor().clamp(0.0, 100.0) as u8
    }
}

/// Summary of one tile download session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileReport {
    pub state: DownloadState,
    pub total: u64,
    /// Tiles fetched from the network this session.
    pub downloaded: u64,
    /// Tiles already on disk.
    pub cached: u64,
    /// Tiles that exhausted their retry budget.
    pub failed: u64,
}

impl TileReport {
    pub fn completed(&self) -> u64 {
        self.downloaded + self.cached
    }

    /// True if every tile of the area is on disk.
    pub fn is_complete(&self) -> bool {
        self.state == DownloadState::Completed && self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_by_units() {
        let mut progress = DownloadProgress::started(4);
        assert_eq!(progress.fraction(), 0.0);

        progress.completed_units = 1;
        assert_eq!(progress.fraction(), 0.25);
        assert_eq!(progress.percent(), 25);

        progress.completed_units = 4;
        assert_eq!(progress.fraction(), 1.0);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_empty_session_fraction() {
        let mut progress = DownloadProgress::started(0);
        assert_eq!(progress.fraction(), 0.0);
        progress.state = DownloadState::Completed;
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_report_completeness() {
        let report = TileReport {
            state: DownloadState::Completed,
            total: 3,
            downloaded: 1,
            cached: 1,
            failed: 1,
        };
        assert_eq!(report.completed(), 2);
        assert!(!report.is_complete());
    }
}
