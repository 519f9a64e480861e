//! Catalog documents.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::poi::{Attraction, Category};

/// Root catalog for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionCatalog {
    pub attractions: Vec<Attraction>,
    pub last_updated: DateTime<Utc>,
    pub total_count: usize,
    /// Distinct categories present, in taxonomy order.
    pub categories: Vec<Category>,
}

impl AttractionCatalog {
    pub fn new(attractions: Vec<Attraction>, last_updated: DateTime<Utc>) -> Self {
        let categories: BTreeSet<Category> = attractions.iter().map(|a| a.category).collect();
        Self {
            total_count: attractions.len(),
            categories: categories.into_iter().collect(),
            attractions,
            last_updated,
        }
    }

    /// Attractions of one category, in catalog order.
    pub fn in_category(&self, category: Category) -> Vec<Attraction> {
        self.attractions
            .iter()
            .filter(|a| a.category == category)
            .cloned()
            .collect()
    }

    /// Builds the partition for `category`, stamped with this catalog's time.
    pub fn partition(&self, category: Category) -> CategoryPartition {
        CategoryPartition {
            category,
            last_updated: self.last_updated,
            attractions: self.in_category(category),
        }
    }
}

/// Attractions of one category, derived from a root catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPartition {
    pub category: Category,
    /// Must equal the root's `lastUpdated` for the partition to be trusted.
    pub last_updated: DateTime<Utc>,
    pub attractions: Vec<Attraction>,
}
