//! Tag classification and attribute extraction.

use super::attraction::Attraction;
use super::element::{RawFeature, Tags};
use super::taxonomy::{Category, PoiType};
use crate::coord::BoundingBox;

/// Tag value matcher for a classification rule.
#[derive(Debug, Clone, Copy)]
enum Value {
    Any,
    Is(&'static str),
}

/// Classification rules in priority order; the first match wins.
const RULES: &[(&str, Value, PoiType)] = &[
    ("tourism", Value::Is("museum"), PoiType::Museum),
    ("tourism", Value::Is("attraction"), PoiType::Attraction),
    ("tourism", Value::Is("viewpoint"), PoiType::Viewpoint),
    ("historic", Value::Any, PoiType::Historic),
    ("leisure", Value::Is("park"), PoiType::Park),
    ("leisure", Value::Is("garden"), PoiType::Garden),
    ("amenity", Value::Is("theatre"), PoiType::Theatre),
    ("amenity", Value::Is("cinema"), PoiType::Cinema),
    ("amenity", Value::Is("arts_centre"), PoiType::ArtsCentre),
    ("amenity", Value::Is("place_of_worship"), PoiType::PlaceOfWorship),
    ("amenity", Value::Is("marketplace"), PoiType::Marketplace),
    ("shop", Value::Is("mall"), PoiType::Mall),
    ("railway", Value::Is("station"), PoiType::Station),
    ("amenity", Value::Is("ferry_terminal"), PoiType::FerryTerminal),
    ("amenity", Value::Is("restaurant"), PoiType::Restaurant),
    ("amenity", Value::Is("cafe"), PoiType::Cafe),
];

/// Maps a tag set to its type and category.
pub fn classify(tags: &Tags) -> (PoiType, Category) {
    let poi_type = RULES
        .iter()
        .find(|(key, value, _)| match (tags.get(*key), value) {
            (Some(_), Value::Any) => true,
            (Some(actual), Value::Is(expected)) => actual == expected,
            (None, _) => false,
        })
        .map(|(_, _, poi_type)| *poi_type)
        .unwrap_or(PoiType::Other);

    (poi_type, poi_type.category())
}

/// Joins the address parts present, in house number, street, postcode, city
/// order.
pub fn format_address(tags: &Tags) -> Option<String> {
    let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:postcode", "addr:city"]
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Reads a numeric rating. Absent or unparsable values stay absent.
pub fn parse_rating(tags: &Tags) -> Option<f32> {
    ["rating", "stars"]
        .iter()
        .filter_map(|key| tags.get(*key))
        .find_map(|v| v.trim().parse::<f32>().ok())
        .filter(|r| r.is_finite())
}

fn first_tag(tags: &Tags, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// Turns a raw feature into an attraction.
///
/// Returns `None` for features without a name, without a position, or whose
/// position lies outside `bbox`; upstream bounds are not always honoured
/// exactly.
pub fn to_attraction(feature: &RawFeature, bbox: &BoundingBox) -> Option<Attraction> {
    let name = feature.name()?;
    let (lat, lon) = feature.position?;
    if !bbox.contains(lat, lon) {
        return None;
    }

    let tags = &feature.tags;
    let (poi_type, category) = classify(tags);

    Some(Attraction {
        id: feature.id.clone(),
        name: name.to_string(),
        poi_type,
        category,
        latitude: lat,
        longitude: lon,
        address: format_address(tags),
        website: first_tag(tags, &["website", "contact:website", "url"]),
        phone: first_tag(tags, &["phone", "contact:phone"]),
        opening_hours: first_tag(tags, &["opening_hours"]),
        rating: parse_rating(tags),
        tags: tags.clone(),
    })
}

/// Classifies a batch, silently dropping unusable features.
pub fn classify_all(features: &[RawFeature], bbox: &BoundingBox) -> Vec<Attraction> {
    let attractions: Vec<Attraction> = features
        .iter()
        .filter_map(|f| to_attraction(f, bbox))
        .collect();

    tracing::debug!(
        received = features.len(),
        kept = attractions.len(),
        "Classified features"
    );
    attractions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bbox() -> BoundingBox {
        BoundingBox::new(48.90, 48.82, 2.42, 2.25).unwrap()
    }

    fn feature(pairs: &[(&str, &str)], position: Option<(f64, f64)>) -> RawFeature {
        RawFeature {
            id: "node/42".to_string(),
            tags: tags(pairs),
            position,
        }
    }

    #[test]
    fn test_museum_beats_park() {
        let result = classify(&tags(&[("tourism", "museum"), ("leisure", "park")]));
        assert_eq!(result, (PoiType::Museum, Category::Culture));
        assert_eq!(result.0.as_str(), "museum");
    }

    #[test]
    fn test_precedence_chain() {
        let cases: &[(&[(&str, &str)], PoiType)] = &[
            (&[("tourism", "attraction"), ("historic", "castle")], PoiType::Attraction),
            (&[("tourism", "viewpoint"), ("historic", "yes")], PoiType::Viewpoint),
            (&[("historic", "memorial"), ("leisure", "park")], PoiType::Historic),
            (&[("leisure", "park"), ("amenity", "theatre")], PoiType::Park),
            (&[("leisure", "garden"), ("amenity", "cinema")], PoiType::Garden),
            (&[("amenity", "arts_centre"), ("shop", "mall")], PoiType::ArtsCentre),
            (&[("amenity", "place_of_worship"), ("railway", "station")], PoiType::PlaceOfWorship),
            (&[("amenity", "marketplace")], PoiType::Marketplace),
            (&[("shop", "mall"), ("railway", "station")], PoiType::Mall),
            (&[("railway", "station"), ("amenity", "ferry_terminal")], PoiType::Station),
            (&[("amenity", "ferry_terminal")], PoiType::FerryTerminal),
            (&[("amenity", "cafe")], PoiType::Cafe),
        ];

        for (pairs, expected) in cases {
            assert_eq!(classify(&tags(pairs)).0, *expected, "tags {:?}", pairs);
        }
    }

    #[test]
    fn test_unknown_tags_fall_back_to_other() {
        let result = classify(&tags(&[("tourism", "hotel"), ("amenity", "bench")]));
        assert_eq!(result, (PoiType::Other, Category::Other));
        assert_eq!(classify(&Tags::new()), (PoiType::Other, Category::Other));
    }

    #[test]
    fn test_address_skips_missing_parts() {
        let full = tags(&[
            ("addr:housenumber", "99"),
            ("addr:street", "Rue de Rivoli"),
            ("addr:postcode", "75001"),
            ("addr:city", "Paris"),
        ]);
        assert_eq!(
            format_address(&full).as_deref(),
            Some("99, Rue de Rivoli, 75001, Paris")
        );

        let partial = tags(&[("addr:street", "Rue de Rivoli"), ("addr:city", "Paris")]);
        assert_eq!(format_address(&partial).as_deref(), Some("Rue de Rivoli, Paris"));
        assert_eq!(format_address(&Tags::new()), None);
    }

    #[test]
    fn test_rating_is_never_defaulted() {
        assert_eq!(parse_rating(&tags(&[("rating", "4.5")])), Some(4.5));
        assert_eq!(parse_rating(&tags(&[("stars", "3")])), Some(3.0));
        assert_eq!(parse_rating(&tags(&[("rating", "excellent")])), None);
        assert_eq!(parse_rating(&tags(&[("rating", "NaN")])), None);
        assert_eq!(parse_rating(&Tags::new()), None);
    }

    #[test]
    fn test_to_attraction_extracts_fields() {
        let f = feature(
            &[
                ("name", "Musée d'Orsay"),
                ("tourism", "museum"),
                ("website", "https://www.musee-orsay.fr"),
                ("contact:phone", "+33 1 40 49 48 14"),
                ("opening_hours", "Tu-Su 09:30-18:00"),
                ("addr:city", "Paris"),
            ],
            Some((48.86, 2.326)),
        );

        let a = to_attraction(&f, &bbox()).unwrap();

        assert_eq!(a.name, "Musée d'Orsay");
        assert_eq!(a.poi_type, PoiType::Museum);
        assert_eq!(a.category, Category::Culture);
        assert_eq!(a.website.as_deref(), Some("https://www.musee-orsay.fr"));
        assert_eq!(a.phone.as_deref(), Some("+33 1 40 49 48 14"));
        assert_eq!(a.opening_hours.as_deref(), Some("Tu-Su 09:30-18:00"));
        assert_eq!(a.address.as_deref(), Some("Paris"));
        assert_eq!(a.rating, None);
        assert_eq!(a.tags.len(), 6);
    }

    #[test]
    fn test_unusable_features_are_dropped() {
        let unnamed = feature(&[("tourism", "museum")], Some((48.86, 2.33)));
        let unplaced = feature(&[("name", "X"), ("tourism", "museum")], None);
        let outside = feature(&[("name", "Y"), ("tourism", "museum")], Some((51.5, -0.12)));
        let good = feature(&[("name", "Z"), ("leisure", "park")], Some((48.85, 2.30)));

        let kept = classify_all(&[unnamed, unplaced, outside, good], &bbox());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Z");
        assert_eq!(kept[0].category, Category::Nature);
    }
}
