// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines all serialization/deserialization models for the model reply, API and storage

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use super::catalog::ANY;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const MAPS_EMBED_URL: &str = "https://www.google.com/maps";

/// A pet-friendly place as returned by the model
/// DOCUMENTATION: Identity is derived from name and address, never stored
/// Used for search results and as the favorite snapshot format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Place name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Physical street address
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,

    /// Short description of what makes the place pet-friendly
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    /// Latitude in degrees
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,

    /// Longitude in degrees
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,

    /// Average Google Maps rating (0-5)
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub google_rating: Option<f64>,

    /// Distance from the user in kilometers, recomputed per request
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Accepts strings and numbers; anything else becomes empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Accepts numbers and numeric strings; anything else is treated as absent
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}

/// Derived place key shared by favorites and reviews
pub fn place_identity(name: &str, address: &str) -> String {
    format!("{}-{}", name, address)
}

impl Place {
    /// Place with only the identity fields set
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Place {
            name: name.into(),
            address: address.into(),
            description: String::new(),
            latitude: None,
            longitude: None,
            google_rating: None,
            distance: None,
        }
    }

    pub fn identity(&self) -> String {
        place_identity(&self.name, &self.address)
    }

    /// Coordinates as a GeoPoint, if both are present and in range
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => None,
        }
    }

    /// Snapshot suitable for durable storage (derived fields removed)
    pub fn snapshot(&self) -> Place {
        Place {
            distance: None,
            ..self.clone()
        }
    }

    /// Public Google Maps search link for this place
    pub fn maps_search_url(&self) -> String {
        let query = format!("{} {}", self.name, self.address);
        match Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", query.as_str())]) {
            Ok(url) => url.to_string(),
            Err(_) => MAPS_SEARCH_URL.to_string(),
        }
    }

    /// Embeddable map centered on this place
    pub fn map_embed_url(&self) -> String {
        match self.coordinates() {
            Some(point) => point.map_embed_url(15),
            None => map_embed_query_url(&format!("{} {}", self.name, self.address)),
        }
    }
}

/// Embeddable map for a free-text query (e.g. a city name)
pub fn map_embed_query_url(query: &str) -> String {
    match Url::parse_with_params(MAPS_EMBED_URL, &[("output", "embed"), ("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => MAPS_EMBED_URL.to_string(),
    }
}

/// Map focus for a result list: first place with coordinates, else the city
pub fn results_map_url(city: &str, places: &[Place]) -> String {
    match places.first().and_then(Place::coordinates) {
        Some(point) => point.map_embed_url(12),
        None => map_embed_query_url(city),
    }
}

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(GeoPoint {
            latitude,
            longitude,
        })
    }

    fn map_embed_url(&self, zoom: u8) -> String {
        format!(
            "{}?output=embed&q={},{}&z={}",
            MAPS_EMBED_URL, self.latitude, self.longitude, zoom
        )
    }
}

/// Result ordering requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the model's order
    #[default]
    Default,
    /// Highest Google rating first
    Rating,
    /// Nearest first
    Distance,
}

/// Structured search criteria
/// DOCUMENTATION: District and place type use the ANY sentinel for "no filter"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCriteria {
    pub city: String,
    pub district: String,
    pub place_type: String,
    pub keyword: String,
}

impl SearchCriteria {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            district: ANY.to_string(),
            place_type: ANY.to_string(),
            keyword: String::new(),
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    pub fn with_place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Location phrase: the city, plus the district unless it is ANY
    pub fn location_string(&self) -> String {
        if self.district == ANY {
            self.city.clone()
        } else {
            format!("{}{}", self.city, self.district)
        }
    }
}

/// Request DTO for POST /places/search
/// DOCUMENTATION: Criteria plus presentation options (sort, location, page)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    /// City name (required)
    #[validate(length(min = 1, max = 50))]
    pub city: String,

    /// District filter, omitted or ANY for the whole city
    #[serde(default)]
    pub district: Option<String>,

    /// Place type filter, omitted or ANY for every type
    #[serde(default)]
    pub place_type: Option<String>,

    /// Free-text keyword
    #[serde(default)]
    #[validate(length(max = 100))]
    pub keyword: Option<String>,

    /// Result ordering
    #[serde(default)]
    pub sort: SortOrder,

    /// Client location latitude (overrides the process location)
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Client location longitude
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Page number (1-based)
    #[serde(default)]
    #[validate(range(min = 1))]
    pub page: Option<usize>,

    /// Results per page (max 100)
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<usize>,
}

impl SearchRequest {
    /// Normalize into SearchCriteria, mapping blanks to the ANY sentinel
    pub fn criteria(&self) -> SearchCriteria {
        let or_any = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(ANY)
                .to_string()
        };

        SearchCriteria::new(self.city.trim())
            .with_district(or_any(&self.district))
            .with_place_type(or_any(&self.place_type))
            .with_keyword(self.keyword.as_deref().map(str::trim).unwrap_or_default())
    }

    /// Location carried by the request
    /// DOCUMENTATION: Both coordinates or neither; out-of-range values are rejected
    pub fn client_location(&self) -> Result<Option<GeoPoint>, String> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)
                .map(Some)
                .ok_or_else(|| format!("location out of range: {}, {}", lat, lon)),
            (None, None) => Ok(None),
            _ => Err("latitude and longitude must be provided together".to_string()),
        }
    }
}

/// Place enriched with the caller's favorite and review state
#[derive(Debug, Clone, Serialize)]
pub struct PlaceResponse {
    /// Derived identity (name-address)
    pub id: String,

    #[serde(flatten)]
    pub place: Place,

    pub is_favorite: bool,

    /// Mean of local review ratings (0 when none)
    pub review_average: f64,

    pub review_count: usize,

    /// Google Maps search link
    pub maps_url: String,

    /// Embeddable map focused on this place
    pub map_url: String,
}

/// Paginated search response
/// DOCUMENTATION: Mirrors the client-side "load more" paging of the front-end
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Places on the requested page, already sorted
    pub places: Vec<PlaceResponse>,

    /// Total number of places returned by the model
    pub total: usize,

    /// Current page
    pub page: usize,

    /// Results per page
    pub per_page: usize,

    /// Total pages
    pub total_pages: usize,

    /// Whether another page exists
    pub has_more: bool,

    /// Whether distances could be computed for this request
    pub location_enabled: bool,

    /// Embeddable map focused on the results
    pub map_url: String,
}
