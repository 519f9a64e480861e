//! Composite Overpass query.
//!
//! All predicates go into a single request; the feature database answers with
//! every matching node, way and relation inside the bounding box.

use std::sync::Arc;

use url::Url;

use super::element::{parse_response, RawFeature};
use super::error::PoiError;
use crate::coord::BoundingBox;
use crate::provider::HttpClient;

/// Public Overpass API interpreter.
pub const DEFAULT_POI_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout, in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 60;

/// One Overpass tag filter: key plus a value alternation (`None` matches any
/// value).
struct TagFilter {
    key: &'static str,
    values: Option<&'static str>,
    named_only: bool,
}

const fn filter(key: &'static str, values: &'static str) -> TagFilter {
    TagFilter {
        key,
        values: Some(values),
        named_only: false,
    }
}

/// Source domain of the taxonomy.
const PREDICATES: &[TagFilter] = &[
    filter("tourism", "museum|attraction|viewpoint"),
    TagFilter {
        key: "historic",
        values: None,
        named_only: false,
    },
    filter("leisure", "park|garden"),
    filter(
        "amenity",
        "theatre|cinema|arts_centre|place_of_worship|marketplace|ferry_terminal",
    ),
    filter("shop", "mall"),
    filter("railway", "station"),
];

const FOOD_AND_DRINK: TagFilter = TagFilter {
    key: "amenity",
    values: Some("restaurant|cafe"),
    named_only: true,
};

impl TagFilter {
    fn render(&self, bbox: &str) -> String {
        let value = match self.values {
            Some(values) => format!("[\"{}\"~\"^({})$\"]", self.key, values),
            None => format!("[\"{}\"]", self.key),
        };
        let name = if self.named_only { "[\"name\"]" } else { "" };
        format!("  nwr{}{}({});\n", value, name, bbox)
    }
}

/// Builds the Overpass QL text for `bbox`.
pub fn build_query(bbox: &BoundingBox, include_food_and_drink: bool, timeout_secs: u32) -> String {
    // Overpass orders bounds as south, west, north, east.
    let bounds = format!(
        "{},{},{},{}",
        bbox.south(),
        bbox.west(),
        bbox.north(),
        bbox.east()
    );

    let mut query = format!("[out:json][timeout:{}];\n(\n", timeout_secs);
    for predicate in PREDICATES {
        query.push_str(&predicate.render(&bounds));
    }
    if include_food_and_drink {
        query.push_str(&FOOD_AND_DRINK.render(&bounds));
    }
    query.push_str(");\nout center tags;\n");
    query
}

/// Client for the feature database.
pub struct PoiQueryClient {
    endpoint: String,
    client: Arc<dyn HttpClient>,
    timeout_secs: u32,
    include_food_and_drink: bool,
}

impl PoiQueryClient {
    pub fn new(endpoint: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            include_food_and_drink: false,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Adds named restaurants and cafés to the query.
    pub fn with_food_and_drink(mut self, include: bool) -> Self {
        self.include_food_and_drink = include;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full request URL with the url-encoded query in `data`.
    pub fn request_url(&self, bbox: &BoundingBox) -> Result<Url, PoiError> {
        let query = build_query(bbox, self.include_food_and_drink, self.timeout_secs);
        Url::parse_with_params(&self.endpoint, &[("data", query.as_str())]).map_err(|e| {
            PoiError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Issues the single request for `bbox` and parses the answer.
    pub fn fetch(&self, bbox: &BoundingBox) -> Result<Vec<RawFeature>, PoiError> {
        let url = self.request_url(bbox)?;

        tracing::info!(endpoint = %self.endpoint, bbox = %bbox, "Querying points of interest");
        let body = self.client.get(url.as_str())?;
        let features = parse_response(&body)?;

        tracing::info!(features = features.len(), "POI query returned");
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn bbox() -> BoundingBox {
        BoundingBox::new(48.90, 48.82, 2.42, 2.25).unwrap()
    }

    #[test]
    fn test_query_covers_every_predicate_once() {
        let query = build_query(&bbox(), false, 25);

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("nwr[\"tourism\"~\"^(museum|attraction|viewpoint)$\"](48.82,2.25,48.9,2.42);"));
        assert!(query.contains("nwr[\"historic\"](48.82,2.25,48.9,2.42);"));
        assert!(query.contains("[\"shop\"~\"^(mall)$\"]"));
        assert!(query.contains("[\"railway\"~\"^(station)$\"]"));
        assert!(!query.contains("restaurant"));
        assert!(query.ends_with("out center tags;\n"));
    }

    #[test]
    fn test_food_and_drink_requires_name() {
        let query = build_query(&bbox(), true, 25);
        assert!(query.contains("nwr[\"amenity\"~\"^(restaurant|cafe)$\"][\"name\"]"));
    }

    #[test]
    fn test_fetch_issues_exactly_one_request() {
        let body = br#"{"elements": [
            {"type": "node", "id": 7, "lat": 48.86, "lon": 2.33, "tags": {"name": "Louvre", "tourism": "museum"}}
        ]}"#;
        let mock = Arc::new(MockHttpClient::ok(body));
        let client = PoiQueryClient::new(DEFAULT_POI_ENDPOINT, mock.clone());

        let features = client.fetch(&bbox()).unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(mock.request_count(), 1);
        let url = &mock.requests()[0];
        assert!(url.starts_with("https://overpass-api.de/api/interpreter?data="));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_service_error_fails_the_batch() {
        let mock = Arc::new(MockHttpClient::status(429));
        let client = PoiQueryClient::new(DEFAULT_POI_ENDPOINT, mock);

        let err = client.fetch(&bbox()).unwrap_err();
        assert!(matches!(err, PoiError::Service(ref e) if e.status() == Some(429)));
    }

    #[test]
    fn test_invalid_endpoint() {
        let mock = Arc::new(MockHttpClient::ok(b"{}"));
        let client = PoiQueryClient::new("not a url", mock.clone());

        assert!(matches!(
            client.fetch(&bbox()),
            Err(PoiError::InvalidEndpoint { .. })
        ));
        assert_eq!(mock.request_count(), 0);
    }
}
