//! Persisted attraction catalog.
//!
//! Layout under the catalog directory:
//!
//! ```text
//! attractions.json        root catalog, authoritative
//! {category_slug}.json    per-category partitions, derived
//! ```
//!
//! Partitions are written first and the root last. A reader that finds a
//! partition whose `lastUpdated` differs from the root's ignores it and
//! derives the category from the root.

mod error;
mod model;
mod store;

pub use error::StoreError;
pub use model::{AttractionCatalog, CategoryPartition};
pub use store::{CatalogStore, ROOT_FILE_NAME};
