//! Classified point of interest.

use serde::{Deserialize, Serialize};

use super::element::Tags;
use super::taxonomy::{Category, PoiType};

/// A named, classified feature ready for offline use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub poi_type: PoiType,
    pub category: Category,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    /// The original tags, kept for consumers that need more than the
    /// extracted fields.
    #[serde(default)]
    pub tags: Tags,
}

impl Attraction {
    /// Great-circle distance to a point, in kilometres.
    pub fn distance_km(&self, lat: f64, lon: f64) -> f64 {
        haversine_km(self.latitude, self.longitude, lat, lon)
    }
}

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_paris_london() {
        let km = haversine_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((km - 343.5).abs() < 2.0, "got {km}");
    }

    #[test]
    fn test_haversine_zero() {
        assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let attraction = Attraction {
            id: "node/1".to_string(),
            name: "Louvre".to_string(),
            poi_type: PoiType::Museum,
            category: Category::Culture,
            latitude: 48.86,
            longitude: 2.33,
            address: None,
            website: None,
            phone: None,
            opening_hours: None,
            rating: None,
            tags: Tags::new(),
        };

        let json = serde_json::to_value(&attraction).unwrap();
        assert_eq!(json["type"], "museum");
        assert_eq!(json["category"], "Culture");
        assert!(json.get("rating").is_none());
        assert!(json.get("openingHours").is_none());
    }
}
