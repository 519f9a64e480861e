//! Sequential tile pyramid downloader.
//!
//! Walks every tile of the configured area, zoom levels ascending, one request
//! at a time. Each network request is followed by a fixed politeness delay
//! before the next one; this bounds the request rate against the shared tile
//! server and is not a tuning knob to be removed.
//!
//! Pause and cancel are observed between tiles, never mid-request. Tiles that
//! were written before a cancel stay on disk.

use std::time::Duration;

use tokio::sync::watch;

use super::control::{Checkpoint, DownloadControl, DownloadState};
use super::error::{TileError, TileSyncError};
use super::fetcher::{FetchOutcome, TileFetcher};
use super::progress::{DownloadProgress, TileReport};
use crate::coord::{tiles_for_zoom, total_tiles, BoundingBox, TileCoordinate};

/// Default delay between tile requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1000);

/// Shortest delay a configuration may ask for.
pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(1000);

/// Default number of attempts per tile within one session.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Outcome of working on one tile.
enum TileAttempt {
    Stored(FetchOutcome),
    Exhausted,
    Cancelled,
}

/// Downloads the tile pyramid for one area.
pub struct PyramidDownloader {
    fetcher: TileFetcher,
    bbox: BoundingBox,
    zooms: Vec<u8>,
    delay: Duration,
    max_attempts: u32,
    control: DownloadControl,
    progress: watch::Sender<DownloadProgress>,
}

impl PyramidDownloader {
    /// Creates a downloader. Zoom levels are sorted and deduplicated.
    pub fn new(fetcher: TileFetcher, bbox: BoundingBox, zooms: &[u8]) -> Self {
        let mut zooms = zooms.to_vec();
        zooms.sort_unstable();
        zooms.dedup();

        let (progress, _) = watch::channel(DownloadProgress::default());

        Self {
            fetcher,
            bbox,
            zooms,
            delay: DEFAULT_REQUEST_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            control: DownloadControl::new(),
            progress,
        }
    }

    /// Sets the delay enforced after every network request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the per-tile attempt budget (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn zooms(&self) -> &[u8] {
        &self.zooms
    }

    pub fn fetcher(&self) -> &TileFetcher {
        &self.fetcher
    }

    pub fn state(&self) -> DownloadState {
        self.control.state()
    }

    /// Latest progress snapshot.
    pub fn progress(&self) -> DownloadProgress {
        *self.progress.borrow()
    }

    /// Subscribes to progress updates.
    pub fn subscribe(&self) -> watch::Receiver<DownloadProgress> {
        self.progress.subscribe()
    }

    pub fn pause(&self) -> bool {
        self.control_and_publish(self.control.pause())
    }

    pub fn resume(&self) -> bool {
        self.control_and_publish(self.control.resume())
    }

    pub fn cancel(&self) -> bool {
        self.control_and_publish(self.control.cancel())
    }

    /// Returns a finished session to Idle.
    pub fn acknowledge(&self) -> bool {
        self.control_and_publish(self.control.acknowledge())
    }

    /// Number of tiles of the area not yet on disk.
    pub fn missing_tiles(&self) -> u64 {
        self.tiles()
            .filter(|tile| !self.fetcher.store().contains(tile))
            .count() as u64
    }

    /// Total number of tiles covering the area.
    pub fn total_tiles(&self) -> u64 {
        total_tiles(&self.bbox, &self.zooms)
    }

    /// Runs one download session to its end.
    ///
    /// Blocks the calling thread. Returns [`TileSyncError::AlreadyRunning`] if
    /// another session is active, and [`TileSyncError::Storage`] if tiles can no
    /// longer be written. Network failures are counted, not returned.
    pub fn run(&self) -> Result<TileReport, TileSyncError> {
        if !self.control.try_begin() {
            return Err(TileSyncError::AlreadyRunning);
        }

        let total = self.total_tiles();
        self.progress.send_replace(DownloadProgress::started(total));
        tracing::info!(
            bbox = %self.bbox,
            zooms = ?self.zooms,
            total,
            "Tile download started"
        );

        let mut report = TileReport {
            total,
            ..TileReport::default()
        };

        let outcome = self.download_all(&mut report);

        let state = self.control.finish(match &outcome {
            Ok(state) => *state,
            Err(_) => DownloadState::Failed,
        });
        report.state = state;
        self.progress.send_modify(|p| p.state = state);

        match outcome {
            Ok(_) => {
                tracing::info!(
                    state = %state,
                    downloaded = report.downloaded,
                    cached = report.cached,
                    failed = report.failed,
                    "Tile download finished"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Tile download failed");
                Err(e.into())
            }
        }
    }

    fn tiles(&self) -> impl Iterator<Item = TileCoordinate> + '_ {
        self.zooms
            .iter()
            .flat_map(move |&zoom| tiles_for_zoom(&self.bbox, zoom).iter())
    }

    fn download_all(&self, report: &mut TileReport) -> Result<DownloadState, TileError> {
        for tile in self.tiles() {
            match self.fetch_with_budget(&tile)? {
                TileAttempt::Stored(FetchOutcome::Cached) => {
                    report.cached += 1;
                    self.progress.send_modify(|p| p.completed_units += 1);
                }
                TileAttempt::Stored(FetchOutcome::Downloaded { .. }) => {
                    report.downloaded += 1;
                    self.progress.send_modify(|p| p.completed_units += 1);
                }
                TileAttempt::Exhausted => {
                    report.failed += 1;
                    self.progress.send_modify(|p| p.failed_units += 1);
                }
                TileAttempt::Cancelled => {
                    tracing::info!(tile = %tile, "Tile download cancelled");
                    return Ok(DownloadState::Cancelled);
                }
            }
        }
        Ok(DownloadState::Completed)
    }

    fn fetch_with_budget(&self, tile: &TileCoordinate) -> Result<TileAttempt, TileError> {
        for attempt in 1..=self.max_attempts {
            if self.control.checkpoint() == Checkpoint::Cancelled {
                return Ok(TileAttempt::Cancelled);
            }

            match self.fetcher.fetch(tile) {
                // No request was made, so no delay is owed.
                Ok(FetchOutcome::Cached) => return Ok(TileAttempt::Stored(FetchOutcome::Cached)),
                Ok(outcome) => {
                    // A cancel during the delay is picked up at the next checkpoint.
                    self.control.wait(self.delay);
                    return Ok(TileAttempt::Stored(outcome));
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(
                        tile = %tile,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Tile fetch failed"
                    );
                    if self.control.wait(self.delay) == Checkpoint::Cancelled {
                        return Ok(TileAttempt::Cancelled);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(TileAttempt::Exhausted)
    }

    fn control_and_publish(&self, changed: bool) -> bool {
        if changed {
            let state = self.control.state();
            self.progress.send_modify(|p| p.state = state);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockHttpClient, TileServer};
    use crate::tile::TileStore;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;
    use tempfile::TempDir;

    /// A box small enough to cover a handful of tiles at zoom 12-13.
    fn small_bbox() -> BoundingBox {
        BoundingBox::new(48.86, 48.85, 2.36, 2.34).unwrap()
    }

    /// Central Paris; roughly a hundred tiles over zoom 12-14, enough for a
    /// session to outlive the controlling thread's pokes.
    fn wide_bbox() -> BoundingBox {
        BoundingBox::new(48.90, 48.82, 2.42, 2.25).unwrap()
    }

    fn downloader_for(
        temp: &TempDir,
        client: Arc<MockHttpClient>,
        bbox: BoundingBox,
        zooms: &[u8],
    ) -> PyramidDownloader {
        let fetcher = TileFetcher::new(
            TileStore::new(temp.path().join("tiles")),
            TileServer::new("https://tiles.test"),
            client,
        );
        PyramidDownloader::new(fetcher, bbox, zooms).with_delay(Duration::ZERO)
    }

    fn downloader(temp: &TempDir, client: Arc<MockHttpClient>, zooms: &[u8]) -> PyramidDownloader {
        downloader_for(temp, client, small_bbox(), zooms)
    }

    fn slow_downloader(temp: &TempDir) -> Arc<PyramidDownloader> {
        let client = Arc::new(MockHttpClient::ok(b"png"));
        Arc::new(
            downloader_for(temp, client, wide_bbox(), &[12, 13, 14])
                .with_delay(Duration::from_millis(10)),
        )
    }

    #[test]
    fn test_completes_and_reports_full_progress() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::ok(b"png"));
        let dl = downloader(&temp, Arc::clone(&client), &[13, 12]);

        let report = dl.run().unwrap();

        assert_eq!(report.state, DownloadState::Completed);
        assert_eq!(report.downloaded, dl.total_tiles());
        assert_eq!(dl.progress().fraction(), 1.0);
        assert_eq!(dl.missing_tiles(), 0);
        assert_eq!(client.request_count() as u64, dl.total_tiles());
    }

    #[test]
    fn test_zoom_levels_are_visited_ascending() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::ok(b"png"));
        let dl = downloader(&temp, Arc::clone(&client), &[13, 12, 13]);

        assert_eq!(dl.zooms(), &[12, 13]);
        dl.run().unwrap();

        let zooms: Vec<u8> = client
            .requests()
            .iter()
            .map(|url| url.split('/').nth(3).unwrap().parse().unwrap())
            .collect();
        let mut sorted = zooms.clone();
        sorted.sort();
        assert_eq!(zooms, sorted);
    }

    #[test]
    fn test_second_session_uses_cache() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::ok(b"png"));
        let dl = downloader(&temp, Arc::clone(&client), &[12, 13]);

        dl.run().unwrap();
        let requests = client.request_count();
        let report = dl.run().unwrap();

        assert_eq!(client.request_count(), requests);
        assert_eq!(report.cached, dl.total_tiles());
        assert_eq!(dl.progress().fraction(), 1.0);
    }

    #[test]
    fn test_failed_tiles_are_skipped_within_budget() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::status(500).with_route("/12/", Ok(b"png".to_vec())));
        let dl = downloader(&temp, Arc::clone(&client), &[12, 13]).with_max_attempts(3);

        let report = dl.run().unwrap();

        let z13 = tiles_for_zoom(&small_bbox(), 13).len();
        assert_eq!(report.state, DownloadState::Completed);
        assert_eq!(report.failed, z13);
        assert_eq!(report.downloaded, dl.total_tiles() - z13);
        assert!(!report.is_complete());
        // Three attempts for each failing tile, one for each good one.
        assert_eq!(
            client.request_count() as u64,
            report.downloaded + 3 * z13
        );
        assert!(dl.progress().fraction() < 1.0);
    }

    #[test]
    fn test_storage_failure_fails_session() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tiles"), b"file in the way").unwrap();
        let dl = downloader(&temp, Arc::new(MockHttpClient::ok(b"png")), &[12]);

        let result = dl.run();

        assert!(matches!(result, Err(TileSyncError::Storage(_))));
        assert_eq!(dl.state(), DownloadState::Failed);
    }

    #[test]
    fn test_delay_applies_between_requests() {
        let temp = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::ok(b"png"));
        let dl = downloader(&temp, client, &[12]).with_delay(Duration::from_millis(20));
        let total = dl.total_tiles();

        let start = Instant::now();
        dl.run().unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20) * total as u32);
    }

    #[test]
    fn test_pause_resume_keeps_progress() {
        let temp = TempDir::new().unwrap();
        let dl = slow_downloader(&temp);

        let worker = {
            let dl = Arc::clone(&dl);
            thread::spawn(move || dl.run())
        };

        while dl.progress().completed_units == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(dl.pause());
        // Let the in-flight tile and its delay drain.
        thread::sleep(Duration::from_millis(50));
        let paused_at = dl.progress().completed_units;
        thread::sleep(Duration::from_millis(50));
        assert_eq!(dl.progress().completed_units, paused_at);
        assert_eq!(dl.state(), DownloadState::Paused);

        assert!(dl.resume());
        let report = worker.join().unwrap().unwrap();

        assert!(report.completed() >= paused_at);
        assert_eq!(report.state, DownloadState::Completed);
        assert_eq!(report.downloaded, dl.total_tiles());
    }

    #[test]
    fn test_cancel_then_restart_counts_from_zero() {
        let temp = TempDir::new().unwrap();
        let dl = slow_downloader(&temp);

        let worker = {
            let dl = Arc::clone(&dl);
            thread::spawn(move || dl.run())
        };
        while dl.progress().completed_units == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(dl.cancel());
        let report = worker.join().unwrap().unwrap();
        assert_eq!(report.state, DownloadState::Cancelled);
        assert_eq!(dl.state(), DownloadState::Cancelled);

        // The tiles written before the cancel are still valid.
        let kept = report.downloaded;
        assert!(kept >= 1);

        let rerun = dl.run().unwrap();
        assert_eq!(rerun.state, DownloadState::Completed);
        assert_eq!(rerun.cached, kept);
        assert_eq!(rerun.completed(), dl.total_tiles());
    }

    #[test]
    fn test_run_rejected_while_active() {
        let temp = TempDir::new().unwrap();
        let dl = slow_downloader(&temp);

        let worker = {
            let dl = Arc::clone(&dl);
            thread::spawn(move || dl.run())
        };
        while dl.state() != DownloadState::Downloading {
            thread::sleep(Duration::from_millis(1));
        }
        dl.pause();

        assert!(matches!(dl.run(), Err(TileSyncError::AlreadyRunning)));

        dl.resume();
        assert!(worker.join().unwrap().is_ok());
    }
}
