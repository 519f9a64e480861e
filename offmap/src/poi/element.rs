//! Raw features as returned by the feature database.
//!
//! The response is Overpass JSON: `{"elements": [...]}` where each element
//! carries `type`, `id`, `tags` and one of `lat`/`lon` (nodes), `center`
//! (ways and relations queried with `out center`) or `geometry` (queried
//! with `out geom`).

use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::PoiError;

/// Tag map of a feature.
pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    id: i64,
    #[serde(default)]
    tags: Tags,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<LatLon>,
    #[serde(default)]
    geometry: Vec<Option<LatLon>>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    elements: Vec<RawElement>,
}

/// One feature before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    /// `"{type}/{id}"`, e.g. `node/240109189`.
    pub id: String,
    pub tags: Tags,
    /// Resolved `(lat, lon)`: the node position, else the way centroid, else
    /// the first geometry vertex.
    pub position: Option<(f64, f64)>,
}

impl RawFeature {
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

impl RawFeature {
    fn from_element(element: RawElement) -> Self {
        let position = match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => element
                .center
                .or_else(|| element.geometry.iter().flatten().next().copied())
                .map(|p| (p.lat, p.lon)),
        };

        let kind = element.kind.as_deref().unwrap_or("node");
        Self {
            id: format!("{}/{}", kind, element.id),
            tags: element.tags,
            position,
        }
    }
}

/// Parses a response body into raw features.
pub fn parse_response(body: &[u8]) -> Result<Vec<RawFeature>, PoiError> {
    let response: RawResponse =
        serde_json::from_slice(body).map_err(|e| PoiError::Malformed(e.to_string()))?;
    Ok(response.elements.into_iter().map(RawFeature::from_element).collect())
}
