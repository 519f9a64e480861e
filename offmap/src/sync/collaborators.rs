//! Interfaces to collaborators outside the engine.

use crate::poi::Attraction;

/// Source of the device's current position.
pub trait LocationProvider: Send + Sync {
    /// `(latitude, longitude)` in degrees, or `None` without a fix.
    fn current_coordinates(&self) -> Option<(f64, f64)>;
}

/// Text responder, e.g. an on-device assistant.
pub trait ResponseGenerator: Send + Sync {
    fn respond(&self, prompt: &str) -> String;
}

/// A fixed position; useful for tests and for a position given on the
/// command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationProvider for FixedLocation {
    fn current_coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude, self.longitude))
    }
}

/// An attraction with its distance from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyAttraction {
    pub attraction: Attraction,
    pub distance_km: f64,
}

/// Builds the prompt for describing `attraction`.
pub fn attraction_prompt(attraction: &Attraction) -> String {
    let mut prompt = format!(
        "Tell me about {}, a {} ({}).",
        attraction.name,
        attraction.poi_type.as_str().replace('_', " "),
        attraction.category
    );
    if let Some(address) = &attraction.address {
        prompt.push_str(&format!(" Address: {}.", address));
    }
    if let Some(hours) = &attraction.opening_hours {
        prompt.push_str(&format!(" Opening hours: {}.", hours));
    }
    if let Some(rating) = attraction.rating {
        prompt.push_str(&format!(" Rated {:.1}.", rating));
    }
    prompt
}

/// Asks `generator` to describe `attraction`.
pub fn describe_attraction(generator: &dyn ResponseGenerator, attraction: &Attraction) -> String {
    generator.respond(&attraction_prompt(attraction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poi::{PoiType, Tags};

    struct Echo;

    impl ResponseGenerator for Echo {
        fn respond(&self, prompt: &str) -> String {
            format!("> {}", prompt)
        }
    }

    #[test]
    fn test_describe_includes_known_fields() {
        let attraction = Attraction {
            id: "way/5".to_string(),
            name: "Jardin du Luxembourg".to_string(),
            poi_type: PoiType::Garden,
            category: PoiType::Garden.category(),
            latitude: 48.846,
            longitude: 2.337,
            address: Some("Rue de Médicis, Paris".to_string()),
            website: None,
            phone: None,
            opening_hours: None,
            rating: Some(4.5),
            tags: Tags::new(),
        };

        let text = describe_attraction(&Echo, &attraction);

        assert_eq!(
            text,
            "> Tell me about Jardin du Luxembourg, a garden (Nature). \
             Address: Rue de Médicis, Paris. Rated 4.5."
        );
    }
}
