//! Catalog persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;
use super::model::{AttractionCatalog, CategoryPartition};
use crate::atomic::write_atomic;
use crate::poi::{Attraction, Category};

/// File name of the root catalog.
pub const ROOT_FILE_NAME: &str = "attractions.json";

/// Reads and atomically replaces the catalog in one directory.
///
/// Writes return errors; reads never do. A missing file reads as empty, and
/// an unreadable or corrupt file is logged and also reads as empty.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    dir: PathBuf,
    hide_food_and_drink: bool,
}

impl CatalogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            hide_food_and_drink: false,
        }
    }

    /// Leaves Food & Drink out of [`get_all`](Self::get_all). The category
    /// is still stored and served by [`get_by_category`](Self::get_by_category).
    pub fn with_hide_food_and_drink(mut self, hide: bool) -> Self {
        self.hide_food_and_drink = hide;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn root_path(&self) -> PathBuf {
        self.dir.join(ROOT_FILE_NAME)
    }

    pub fn partition_path(&self, category: Category) -> PathBuf {
        self.dir.join(format!("{}.json", category.slug()))
    }

    /// Replaces the whole catalog.
    ///
    /// Every partition is written before the root, and partitions of
    /// categories no longer present are removed after it. If any write fails
    /// the root still holds the previous catalog.
    pub fn replace_all(&self, attractions: Vec<Attraction>) -> Result<AttractionCatalog, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let catalog = AttractionCatalog::new(attractions, Utc::now());

        for category in &catalog.categories {
            let partition = catalog.partition(*category);
            self.write_json(&self.partition_path(*category), &partition)?;
        }
        self.write_json(&self.root_path(), &catalog)?;

        for category in Category::ALL {
            if !catalog.categories.contains(&category) {
                self.remove_if_exists(&self.partition_path(category))?;
            }
        }

        tracing::info!(
            attractions = catalog.total_count,
            categories = catalog.categories.len(),
            dir = %self.dir.display(),
            "Stored attraction catalog"
        );
        Ok(catalog)
    }

    /// The root catalog, if one is stored and readable.
    pub fn catalog(&self) -> Option<AttractionCatalog> {
        read_json(&self.root_path())
    }

    /// Every stored attraction, minus Food & Drink when hidden.
    pub fn get_all(&self) -> Vec<Attraction> {
        let Some(catalog) = self.catalog() else {
            return Vec::new();
        };

        if self.hide_food_and_drink {
            catalog
                .attractions
                .into_iter()
                .filter(|a| a.category != Category::FoodAndDrink)
                .collect()
        } else {
            catalog.attractions
        }
    }

    /// Attractions of one category.
    ///
    /// Served from the partition when it belongs to the current root,
    /// otherwise derived from the root.
    pub fn get_by_category(&self, category: Category) -> Vec<Attraction> {
        let Some(root) = self.catalog() else {
            return Vec::new();
        };

        match read_json::<CategoryPartition>(&self.partition_path(category)) {
            Some(partition)
                if partition.category == category
                    && partition.last_updated == root.last_updated =>
            {
                partition.attractions
            }
            _ => {
                if root.categories.contains(&category) {
                    tracing::debug!(%category, "Partition stale or missing, deriving from root");
                }
                root.in_category(category)
            }
        }
    }

    /// Removes the root and every partition. Returns the number of files
    /// removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        if self.remove_if_exists(&self.root_path())? {
            removed += 1;
        }
        for category in Category::ALL {
            if self.remove_if_exists(&self.partition_path(category))? {
                removed += 1;
            }
        }

        tracing::info!(files = removed, dir = %self.dir.display(), "Cleared attraction catalog");
        Ok(removed)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value)?;
        write_atomic(path, &data).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_if_exists(&self, path: &Path) -> Result<bool, StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Remove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read catalog file");
            return None;
        }
    };

    match serde_json::from_slice(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt catalog file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atomic::temp_path;
    use crate::poi::{PoiType, Tags};
    use tempfile::TempDir;

    fn attraction(id: &str, poi_type: PoiType) -> Attraction {
        Attraction {
            id: format!("node/{}", id),
            name: format!("Place {}", id),
            poi_type,
            category: poi_type.category(),
            latitude: 48.86,
            longitude: 2.33,
            address: None,
            website: None,
            phone: None,
            opening_hours: None,
            rating: None,
            tags: Tags::new(),
        }
    }

    fn sample() -> Vec<Attraction> {
        vec![
            attraction("1", PoiType::Museum),
            attraction("2", PoiType::Park),
            attraction("3", PoiType::Cafe),
            attraction("4", PoiType::Garden),
        ]
    }

    #[test]
    fn test_missing_catalog_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("attractions"));

        assert!(store.get_all().is_empty());
        assert!(store.get_by_category(Category::Culture).is_empty());
        assert!(store.catalog().is_none());
    }

    #[test]
    fn test_replace_all_writes_root_and_partitions() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());

        let catalog = store.replace_all(sample()).unwrap();

        assert_eq!(catalog.total_count, 4);
        assert!(store.root_path().is_file());
        assert!(temp.path().join("culture.json").is_file());
        assert!(temp.path().join("nature.json").is_file());
        assert!(temp.path().join("food_&_drink.json").is_file());
        assert!(!temp.path().join("transport.json").exists());

        assert_eq!(store.get_all().len(), 4);
        assert_eq!(store.get_by_category(Category::Nature).len(), 2);
    }

    #[test]
    fn test_partition_names_never_shadow_root() {
        let store = CatalogStore::new("/data/attractions");

        for category in Category::ALL {
            assert_ne!(store.partition_path(category), store.root_path(), "{}", category);
        }
    }

    #[test]
    fn test_catalog_without_sights_keeps_root() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());

        store
            .replace_all(vec![attraction("1", PoiType::Museum), attraction("2", PoiType::Park)])
            .unwrap();

        assert!(store.root_path().is_file());
        assert!(store.catalog().is_some());
        assert_eq!(store.get_all().len(), 2);
        assert!(store.get_by_category(Category::Sights).is_empty());
    }

    #[test]
    fn test_catalog_with_sights_keeps_root() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());

        store
            .replace_all(vec![
                attraction("1", PoiType::Viewpoint),
                attraction("2", PoiType::Attraction),
                attraction("3", PoiType::Museum),
            ])
            .unwrap();

        let root = store.catalog().unwrap();
        assert_eq!(root.total_count, 3);
        assert!(root.categories.contains(&Category::Sights));
        assert!(temp.path().join("sights.json").is_file());
        assert_eq!(store.get_all().len(), 3);
        assert_eq!(store.get_by_category(Category::Sights).len(), 2);
    }

    #[test]
    fn test_food_and_drink_hidden_from_general_listing_only() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path()).with_hide_food_and_drink(true);
        store.replace_all(sample()).unwrap();

        let all = store.get_all();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|a| a.category != Category::FoodAndDrink));

        let food = store.get_by_category(Category::FoodAndDrink);
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].poi_type, PoiType::Cafe);
    }

    #[test]
    fn test_stale_partitions_are_removed() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        store
            .replace_all(vec![attraction("9", PoiType::Station)])
            .unwrap();

        assert!(!temp.path().join("culture.json").exists());
        assert!(!temp.path().join("nature.json").exists());
        assert!(temp.path().join("transport.json").is_file());
        assert!(store.get_by_category(Category::Culture).is_empty());
    }

    #[test]
    fn test_corrupt_root_reads_empty() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        fs::write(store.root_path(), b"{\"attractions\": [oops").unwrap();

        assert!(store.get_all().is_empty());
        assert!(store.get_by_category(Category::Culture).is_empty());
    }

    #[test]
    fn test_mismatched_partition_falls_back_to_root() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        // A partition left over from a newer, interrupted write.
        let mut partition: CategoryPartition =
            serde_json::from_slice(&fs::read(store.partition_path(Category::Nature)).unwrap())
                .unwrap();
        partition.last_updated = partition.last_updated + chrono::Duration::seconds(5);
        partition.attractions.clear();
        fs::write(
            store.partition_path(Category::Nature),
            serde_json::to_vec(&partition).unwrap(),
        )
        .unwrap();

        assert_eq!(store.get_by_category(Category::Nature).len(), 2);
    }

    #[test]
    fn test_corrupt_partition_falls_back_to_root() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        fs::write(store.partition_path(Category::Culture), b"not json").unwrap();

        assert_eq!(store.get_by_category(Category::Culture).len(), 1);
    }

    #[test]
    fn test_leftover_temp_file_does_not_affect_reads() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        // Process died after writing the temp file but before the rename.
        fs::write(temp_path(&store.root_path()), b"{\"attractions\": [").unwrap();

        let reopened = CatalogStore::new(temp.path());
        assert_eq!(reopened.get_all().len(), 4);
    }

    #[test]
    fn test_failed_write_keeps_previous_catalog() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        let before = store.replace_all(sample()).unwrap();

        // A non-empty directory where a partition must go makes the rename fail.
        let blocker = store.partition_path(Category::Transport);
        fs::create_dir_all(blocker.join("child")).unwrap();

        let result = store.replace_all(vec![attraction("9", PoiType::Station)]);

        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert!(!temp_path(&blocker).exists());
        assert_eq!(store.catalog().unwrap(), before);
        assert_eq!(store.get_all().len(), 4);
    }

    #[test]
    fn test_clear_removes_everything() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());
        store.replace_all(sample()).unwrap();

        assert_eq!(store.clear().unwrap(), 4);
        assert!(store.get_all().is_empty());
        assert_eq!(store.clear().unwrap(), 0);
    }
}
