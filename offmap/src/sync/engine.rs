//! The sync engine: tile stage, then POI stage.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::collaborators::{LocationProvider, NearbyAttraction};
use super::error::SyncError;
use super::report::{SyncOutcome, SyncReport};
use crate::catalog::{AttractionCatalog, CatalogStore};
use crate::config::EngineConfig;
use crate::poi::{classify_all, Attraction, Category, PoiPhase, PoiProgress, PoiQueryClient};
use crate::provider::{HttpClient, ReqwestClient, TileServer};
use crate::tile::{
    DownloadProgress, DownloadState, PyramidDownloader, StoreStats, TileFetcher, TileReport,
    TileStore, TileSyncError,
};

/// Extra client-side time on top of the server-side query timeout.
const POI_CLIENT_GRACE_SECS: u64 = 15;

/// Offline sync for one configured area.
///
/// Built once by the application and shared by handle (`Arc<SyncEngine>`).
/// [`sync_all`](Self::sync_all) blocks its thread; every other method may be
/// called concurrently from other threads.
pub struct SyncEngine {
    config: EngineConfig,
    tiles: PyramidDownloader,
    poi_client: PoiQueryClient,
    catalog: CatalogStore,
    poi_progress: watch::Sender<PoiProgress>,
    session: Mutex<()>,
}

impl SyncEngine {
    /// Creates an engine that uses one HTTP client for both stages.
    pub fn new(config: EngineConfig, client: Arc<dyn HttpClient>) -> Self {
        Self::with_clients(config, client.clone(), client)
    }

    /// Creates an engine with separate clients for tiles and POIs.
    pub fn with_clients(
        config: EngineConfig,
        tile_client: Arc<dyn HttpClient>,
        poi_client: Arc<dyn HttpClient>,
    ) -> Self {
        let fetcher = TileFetcher::new(
            TileStore::new(config.tiles_dir()),
            TileServer::new(&config.tile_server),
            tile_client,
        );
        let tiles = PyramidDownloader::new(fetcher, config.bbox, &config.zoom_levels)
            .with_delay(config.request_delay)
            .with_max_attempts(config.max_attempts);

        let poi_client = PoiQueryClient::new(&config.poi_endpoint, poi_client)
            .with_timeout(config.poi_timeout_secs)
            .with_food_and_drink(config.include_food_and_drink);

        let catalog = CatalogStore::new(config.attractions_dir())
            .with_hide_food_and_drink(config.hide_food_and_drink);

        let (poi_progress, _) = watch::channel(PoiProgress::default());

        Self {
            config,
            tiles,
            poi_client,
            catalog,
            poi_progress,
            session: Mutex::new(()),
        }
    }

    /// Creates an engine talking to the real services.
    pub fn from_config(config: EngineConfig) -> Result<Self, SyncError> {
        let tile_client =
            ReqwestClient::with_user_agent(&config.user_agent, config.tile_timeout_secs)?;
        let poi_client = ReqwestClient::with_user_agent(
            &config.user_agent,
            config.poi_timeout_secs as u64 + POI_CLIENT_GRACE_SECS,
        )?;
        Ok(Self::with_clients(
            config,
            Arc::new(tile_client),
            Arc::new(poi_client),
        ))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates the storage directories.
    pub fn initialize(&self) -> Result<(), SyncError> {
        for dir in [
            self.config.data_dir.clone(),
            self.config.tiles_dir(),
            self.config.attractions_dir(),
        ] {
            create_dir(&dir)?;
        }
        tracing::info!(data_dir = %self.config.data_dir.display(), "Engine initialized");
        Ok(())
    }

    /// Runs a full sync: all tiles, then, unless the tile stage was cancelled
    /// or failed, the POI catalog.
    ///
    /// Blocks until both stages end. Never panics on I/O or network errors;
    /// the outcome is reported in the returned [`SyncReport`].
    pub fn sync_all(&self) -> SyncReport {
        let Some(_session) = self.session.try_lock() else {
            tracing::warn!("Sync requested while another is running");
            return SyncReport::new(SyncOutcome::AlreadyRunning, TileReport::default());
        };

        if let Err(e) = self.initialize() {
            return SyncReport::new(SyncOutcome::TilesFailed(e.to_string()), TileReport::default());
        }

        let tiles = match self.tiles.run() {
            Ok(report) => report,
            Err(TileSyncError::AlreadyRunning) => {
                return SyncReport::new(SyncOutcome::AlreadyRunning, TileReport::default());
            }
            Err(e) => {
                let report = TileReport {
                    state: DownloadState::Failed,
                    ..TileReport::default()
                };
                return SyncReport::new(SyncOutcome::TilesFailed(e.to_string()), report);
            }
        };

        if tiles.state == DownloadState::Cancelled {
            tracing::info!("Sync cancelled, skipping POI stage");
            return SyncReport::new(SyncOutcome::Cancelled, tiles);
        }

        match self.sync_pois() {
            Ok(stored) => {
                tracing::info!(
                    tiles = tiles.completed(),
                    failed_tiles = tiles.failed,
                    attractions = stored,
                    "Sync completed"
                );
                SyncReport {
                    attractions: stored,
                    ..SyncReport::new(SyncOutcome::Completed, tiles)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "POI sync failed, keeping previous catalog");
                self.poi_progress.send_modify(|p| p.phase = PoiPhase::Failed);
                SyncReport::new(SyncOutcome::PoiFailed(e.to_string()), tiles)
            }
        }
    }

    /// Query, classify, store. Any error leaves the stored catalog as it was.
    fn sync_pois(&self) -> Result<usize, SyncError> {
        self.poi_progress
            .send_replace(PoiProgress::phase(PoiPhase::Querying));
        let features = self.poi_client.fetch(&self.config.bbox)?;

        self.poi_progress.send_modify(|p| {
            p.phase = PoiPhase::Classifying;
            p.received = features.len();
        });
        let attractions = classify_all(&features, &self.config.bbox);

        self.poi_progress.send_modify(|p| {
            p.phase = PoiPhase::Storing;
            p.kept = attractions.len();
        });
        let catalog = self.catalog.replace_all(attractions)?;

        self.poi_progress
            .send_modify(|p| p.phase = PoiPhase::Completed);
        Ok(catalog.total_count)
    }

    /// Pauses the tile stage. The POI stage cannot be paused.
    pub fn pause(&self) -> bool {
        self.tiles.pause()
    }

    pub fn resume(&self) -> bool {
        self.tiles.resume()
    }

    /// Cancels the tile stage; the POI stage is then skipped.
    pub fn cancel(&self) -> bool {
        self.tiles.cancel()
    }

    pub fn tile_state(&self) -> DownloadState {
        self.tiles.state()
    }

    pub fn tile_progress(&self) -> DownloadProgress {
        self.tiles.progress()
    }

    pub fn poi_progress(&self) -> PoiProgress {
        *self.poi_progress.borrow()
    }

    pub fn subscribe_tile_progress(&self) -> watch::Receiver<DownloadProgress> {
        self.tiles.subscribe()
    }

    pub fn subscribe_poi_progress(&self) -> watch::Receiver<PoiProgress> {
        self.poi_progress.subscribe()
    }

    /// Listed attractions. Food & Drink is left out when configured to hide.
    pub fn get_all_attractions(&self) -> Vec<Attraction> {
        self.catalog.get_all()
    }

    pub fn get_attractions_by_category(&self, category: Category) -> Vec<Attraction> {
        self.catalog.get_by_category(category)
    }

    /// The stored root catalog, if any.
    pub fn catalog(&self) -> Option<AttractionCatalog> {
        self.catalog.catalog()
    }

    /// Removes every downloaded tile. Refused while a sync is running.
    pub fn clear_tiles(&self) -> Result<StoreStats, SyncError> {
        let _session = self.session.try_lock().ok_or(SyncError::Busy)?;
        let stats = self.tiles.fetcher().store().clear()?;
        self.tiles.acknowledge();
        Ok(stats)
    }

    /// Removes the stored catalog. Refused while a sync is running.
    pub fn clear_attractions(&self) -> Result<usize, SyncError> {
        let _session = self.session.try_lock().ok_or(SyncError::Busy)?;
        let removed = self.catalog.clear()?;
        self.poi_progress.send_replace(PoiProgress::default());
        Ok(removed)
    }

    pub fn tile_stats(&self) -> Result<StoreStats, SyncError> {
        Ok(self.tiles.fetcher().store().stats()?)
    }

    /// Tiles of the area not on disk.
    pub fn missing_tiles(&self) -> u64 {
        self.tiles.missing_tiles()
    }

    pub fn total_tiles(&self) -> u64 {
        self.tiles.total_tiles()
    }

    /// True if every tile of the area at every zoom level is on disk.
    pub fn is_area_fully_downloaded(&self) -> bool {
        self.tiles.missing_tiles() == 0
    }

    /// Listed attractions nearest to the current position, closest first.
    ///
    /// Empty without a position fix.
    pub fn nearest_attractions(
        &self,
        location: &dyn LocationProvider,
        limit: usize,
    ) -> Vec<NearbyAttraction> {
        let Some((lat, lon)) = location.current_coordinates() else {
            return Vec::new();
        };

        let mut nearby: Vec<NearbyAttraction> = self
            .get_all_attractions()
            .into_iter()
            .map(|attraction| NearbyAttraction {
                distance_km: attraction.distance_km(lat, lon),
                attraction,
            })
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby.truncate(limit);
        nearby
    }
}

fn create_dir(path: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(path).map_err(|source| SyncError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
