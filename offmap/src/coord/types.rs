//! Coordinate types for the Web Mercator tile grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum latitude representable in Web Mercator.
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum latitude representable in Web Mercator.
pub const MIN_LAT: f64 = -85.05112878;

/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;

/// Highest zoom level the engine accepts from configuration.
pub const MAX_ZOOM: u8 = 22;

/// Errors produced when constructing coordinate types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("north ({north}) must be greater than south ({south})")]
    InvertedLatitude { north: f64, south: f64 },

    #[error("east ({east}) must be greater than west ({west})")]
    InvertedLongitude { east: f64, west: f64 },

    #[error("latitude out of range: {0}")]
    InvalidLatitude(f64),

    #[error("longitude out of range: {0}")]
    InvalidLongitude(f64),

    #[error("zoom level out of range: {0} (max {MAX_ZOOM})")]
    InvalidZoom(u8),
}

/// Rectangular lat/lon region defining the sync area.
///
/// Construction through [`BoundingBox::new`] guarantees `north > south` and
/// `east > west`, so every downstream computation can rely on a non-empty
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// Create a validated bounding box. Values are in degrees.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, CoordError> {
        for lat in [north, south] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CoordError::InvalidLatitude(lat));
            }
        }
        for lon in [east, west] {
            if !(MIN_LON..=MAX_LON).contains(&lon) {
                return Err(CoordError::InvalidLongitude(lon));
            }
        }
        // NaN fails both comparisons and lands here too.
        if !(north > south) {
            return Err(CoordError::InvertedLatitude { north, south });
        }
        if !(east > west) {
            return Err(CoordError::InvertedLongitude { east, west });
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Returns true if the point lies inside the box (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N{:.4} S{:.4} E{:.4} W{:.4}",
            self.north, self.south, self.east, self.west
        )
    }
}

/// A single cell of the slippy-map grid.
///
/// Valid `x` and `y` lie in `[0, 2^zoom - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoordinate {
    pub fn new(zoom: u8, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Rectangular set of tiles at one zoom level.
///
/// Produced by [`super::tiles_for_zoom`]. Iteration order is fixed: columns
/// ascending, and rows ascending within each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Number of tiles in the range: `(max_x - min_x + 1) * (max_y - min_y + 1)`.
    pub fn len(&self) -> u64 {
        let width = u64::from(self.max_x - self.min_x) + 1;
        let height = u64::from(self.max_y - self.min_y) + 1;
        width * height
    }

    /// Always false; a range holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, tile: &TileCoordinate) -> bool {
        tile.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&tile.x)
            && (self.min_y..=self.max_y).contains(&tile.y)
    }

    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            next_x: self.min_x,
            next_y: self.min_y,
            done: false,
        }
    }
}

impl IntoIterator for TileRange {
    type Item = TileCoordinate;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the tiles of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    next_x: u32,
    next_y: u32,
    done: bool,
}

impl Iterator for TileRangeIter {
    type Item = TileCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let tile = TileCoordinate::new(self.range.zoom, self.next_x, self.next_y);

        if self.next_y < self.range.max_y {
            self.next_y += 1;
        } else if self.next_x < self.range.max_x {
            self.next_x += 1;
            self.next_y = self.range.min_y;
        } else {
            self.done = true;
        }

        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_rejects_inverted_latitude() {
        let result = BoundingBox::new(48.0, 49.0, 3.0, 2.0);
        assert!(matches!(
            result,
            Err(CoordError::InvertedLatitude { .. })
        ));
    }

    #[test]
    fn test_bounding_box_rejects_inverted_longitude() {
        let result = BoundingBox::new(49.0, 48.0, 2.0, 3.0);
        assert!(matches!(
            result,
            Err(CoordError::InvertedLongitude { .. })
        ));
    }

    #[test]
    fn test_bounding_box_rejects_nan() {
        assert!(BoundingBox::new(f64::NAN, 48.0, 3.0, 2.0).is_err());
    }

    #[test]
    fn test_bounding_box_contains_edges() {
        let bbox = BoundingBox::new(49.0, 48.0, 3.0, 2.0).unwrap();
        assert!(bbox.contains(48.5, 2.5));
        assert!(bbox.contains(49.0, 2.0));
        assert!(!bbox.contains(49.1, 2.5));
        assert!(!bbox.contains(48.5, 3.1));
    }

    #[test]
    fn test_tile_range_iterates_column_major() {
        let range = TileRange {
            zoom: 3,
            min_x: 1,
            max_x: 2,
            min_y: 4,
            max_y: 5,
        };

        let tiles: Vec<_> = range.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(tiles, vec![(1, 4), (1, 5), (2, 4), (2, 5)]);
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_single_tile_range() {
        let range = TileRange {
            zoom: 0,
            min_x: 0,
            max_x: 0,
            min_y: 0,
            max_y: 0,
        };
        assert_eq!(range.iter().count(), 1);
        assert!(range.contains(&TileCoordinate::new(0, 0, 0)));
        assert!(!range.contains(&TileCoordinate::new(1, 0, 0)));
    }
}
