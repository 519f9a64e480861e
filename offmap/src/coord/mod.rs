//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and slippy-map tile indices, plus enumeration of the tile set covering a
//! bounding box. Everything here is pure.

mod types;

pub use types::{
    BoundingBox, CoordError, TileCoordinate, TileRange, TileRangeIter, MAX_LAT, MAX_LON, MAX_ZOOM,
    MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Largest valid tile index at `zoom`.
#[inline]
fn max_index(zoom: u8) -> u32 {
    let n = 2.0_f64.powi(zoom as i32);
    (n - 1.0).min(u32::MAX as f64) as u32
}

/// Converts a longitude to the tile column at `zoom`.
///
/// `floor((lon + 180) / 360 * 2^zoom)`, clamped to the grid so that
/// `lon = 180` maps to the last column instead of falling off the edge.
#[inline]
pub fn tile_x(lon: f64, zoom: u8) -> u32 {
    let n = 2.0_f64.powi(zoom as i32);
    let lon = lon.clamp(MIN_LON, MAX_LON);
    let col = ((lon + 180.0) / 360.0 * n).floor();
    (col.max(0.0) as u32).min(max_index(zoom))
}

/// Converts a latitude to the tile row at `zoom`.
///
/// Standard Web Mercator: `floor((1 - ln(tan φ + sec φ) / π) / 2 * 2^zoom)`.
/// Latitudes beyond the Mercator limit are clamped first.
#[inline]
pub fn tile_y(lat: f64, zoom: u8) -> u32 {
    let n = 2.0_f64.powi(zoom as i32);
    let lat_rad = lat.clamp(MIN_LAT, MAX_LAT) * PI / 180.0;
    // asinh(tan φ) == ln(tan φ + sec φ)
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor();
    (row.max(0.0) as u32).min(max_index(zoom))
}

/// Converts a geographic point to its tile coordinate.
#[inline]
pub fn to_tile(lat: f64, lon: f64, zoom: u8) -> TileCoordinate {
    TileCoordinate::new(zoom, tile_x(lon, zoom), tile_y(lat, zoom))
}

/// Returns the rectangular tile set covering `bbox` at `zoom`.
///
/// Columns come from west/east longitude; rows from north/south latitude.
/// Rows grow southward, so the north edge gives the minimum row.
pub fn tiles_for_zoom(bbox: &BoundingBox, zoom: u8) -> TileRange {
    TileRange {
        zoom,
        min_x: tile_x(bbox.west(), zoom),
        max_x: tile_x(bbox.east(), zoom),
        min_y: tile_y(bbox.north(), zoom),
        max_y: tile_y(bbox.south(), zoom),
    }
}

/// Total number of tiles covering `bbox` across all `zooms`.
pub fn total_tiles(bbox: &BoundingBox, zooms: &[u8]) -> u64 {
    zooms.iter().map(|&z| tiles_for_zoom(bbox, z).len()).sum()
}

/// Converts a tile back to the latitude/longitude of its northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoordinate) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}
