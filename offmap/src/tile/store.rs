//! On-disk tile storage.
//!
//! Layout: `{root}/{zoom}/{x}/{y}.png`. A tile file exists if and only if the
//! tile was fully downloaded; files are immutable once written and only an
//! explicit [`TileStore::clear`] removes them.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::TileError;
use crate::atomic::{write_atomic, TEMP_SUFFIX};
use crate::coord::TileCoordinate;

/// File count and total size of stored tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub files: u64,
    pub bytes: u64,
}

/// Tile asset storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct TileStore {
    root: PathBuf,
}

impl TileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical path for a tile.
    pub fn path(&self, tile: &TileCoordinate) -> PathBuf {
        self.root
            .join(tile.zoom.to_string())
            .join(tile.x.to_string())
            .join(format!("{}.png", tile.y))
    }

    /// True if the tile has been downloaded.
    pub fn contains(&self, tile: &TileCoordinate) -> bool {
        self.path(tile).is_file()
    }

    /// Writes a tile, creating its directories on demand.
    pub fn write(&self, tile: &TileCoordinate, data: &[u8]) -> Result<(), TileError> {
        let path = self.path(tile);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| TileError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        write_atomic(&path, data).map_err(|source| TileError::Write { path, source })
    }

    /// Ensures the root directory exists.
    pub fn ensure_root(&self) -> Result<(), TileError> {
        fs::create_dir_all(&self.root).map_err(|source| TileError::CreateDir {
            path: self.root.clone(),
            source,
        })
    }

    /// Counts stored tiles and their total size.
    pub fn stats(&self) -> Result<StoreStats, TileError> {
        let mut stats = StoreStats::default();
        if self.root.exists() {
            self.walk(&self.root, &mut |_, len| {
                stats.files += 1;
                stats.bytes += len;
            })?;
        }
        Ok(stats)
    }

    /// Removes every stored tile.
    pub fn clear(&self) -> Result<StoreStats, TileError> {
        if !self.root.exists() {
            return Ok(StoreStats::default());
        }

        let stats = self.stats()?;
        fs::remove_dir_all(&self.root).map_err(|source| TileError::Access {
            path: self.root.clone(),
            source,
        })?;

        tracing::info!(
            files = stats.files,
            bytes = stats.bytes,
            "Cleared tile store"
        );
        Ok(stats)
    }

    fn walk(&self, dir: &Path, visit: &mut dyn FnMut(&Path, u64)) -> Result<(), TileError> {
        let access = |source| TileError::Access {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(access)? {
            let entry = entry.map_err(access)?;
            let path = entry.path();
            let meta = entry.metadata().map_err(access)?;
            if meta.is_dir() {
                self.walk(&path, visit)?;
            } else if !path.to_string_lossy().ends_with(TEMP_SUFFIX) {
                visit(&path, meta.len());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_layout() {
        let store = TileStore::new("/data/tiles");
        let path = store.path(&TileCoordinate::new(14, 8300, 5636));
        assert_eq!(path, PathBuf::from("/data/tiles/14/8300/5636.png"));
    }

    #[test]
    fn test_write_then_contains() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("tiles"));
        let tile = TileCoordinate::new(12, 2075, 1409);

        assert!(!store.contains(&tile));
        store.write(&tile, b"png").unwrap();
        assert!(store.contains(&tile));
        assert_eq!(fs::read(store.path(&tile)).unwrap(), b"png");
    }

    #[test]
    fn test_stats_ignores_temp_files() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("tiles"));
        let tile = TileCoordinate::new(12, 1, 1);
        store.write(&tile, b"1234").unwrap();

        let leftover = store.path(&TileCoordinate::new(12, 1, 2));
        fs::write(format!("{}{}", leftover.display(), TEMP_SUFFIX), b"partial").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.bytes, 4);
    }

    #[test]
    fn test_clear_removes_everything() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("tiles"));
        store.write(&TileCoordinate::new(12, 1, 1), b"a").unwrap();
        store.write(&TileCoordinate::new(13, 2, 2), b"bc").unwrap();

        let result = store.clear().unwrap();

        assert_eq!(result.files, 2);
        assert_eq!(result.bytes, 3);
        assert!(!store.contains(&TileCoordinate::new(12, 1, 1)));
        assert_eq!(store.clear().unwrap(), StoreStats::default());
    }
}
