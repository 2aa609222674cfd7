//! # Core Type Definitions
//!
//! This module contains the record model shared by every plumbdir component:
//! - Directory records (`Plumber`, `Review`, `ImageRef`)
//! - Location aggregates (`StateData`, `CityData`)
//! - Error types (`DirectoryError`)
//!
//! ## Wire Format
//!
//! Field names follow the bundled dataset: camelCase for records
//! (`reviewCount`, `popularTimes`), PascalCase for scraped reviews
//! (`Name`, `Rating`, `When`). Unknown record fields are preserved in
//! `Plumber::extra` so a record serializes back without loss.
//!
//! ## Presence Rules
//!
//! The dataset is scraped and loosely typed. Empty strings count as absent,
//! and a rating or review count of zero counts as "no rating" / "no reviews".
//! The accessor methods on [`Plumber`] apply those rules in one place.
//! Numeric fields also accept `12.0` and `"12"`; values that are not usable
//! numbers deserialize as absent instead of failing the record.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Day name → free-text hour strings, e.g. `"Monday" => ["8 AM–6 PM"]`.
pub type HoursMap = BTreeMap<String, Vec<String>>;

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// LENIENT NUMBERS
// =============================================================================

/// Numeric fields accept `12`, `12.0` and `"12"`; anything else is absent.
fn number_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Whole, non-negative numbers only: `12.5` and `-3` are absent.
fn number_as_u64(value: &serde_json::Value) -> Option<u64> {
    let exact = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    exact.or_else(|| {
        number_as_f64(value)
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_as_u64(&value).unwrap_or_default())
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_as_u64(&value).and_then(|n| u32::try_from(n).ok()))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_as_f64(&value))
}

/// Return the string slice if the option holds a non-empty string.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// =============================================================================
// DIRECTORY RECORD
// =============================================================================

/// A picture attached to a listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

/// A customer review scraped alongside the listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_picture: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub when: String,
}

/// One listed business (a directory record).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plumber {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<HoursMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popular_times: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
    #[serde(
        rename = "review_summary",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub review_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Fields the model does not name, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Plumber {
    /// Create a record with just the identifying fields set.
    #[must_use]
    pub fn new(id: u64, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// City name, if present and non-empty.
    #[must_use]
    pub fn city_name(&self) -> Option<&str> {
        non_empty(&self.city)
    }

    /// State name, if present and non-empty.
    #[must_use]
    pub fn state_name(&self) -> Option<&str> {
        non_empty(&self.state)
    }

    /// Street address, if present and non-empty.
    #[must_use]
    pub fn address_text(&self) -> Option<&str> {
        non_empty(&self.address)
    }

    /// Phone number, if present and non-empty.
    #[must_use]
    pub fn phone_text(&self) -> Option<&str> {
        non_empty(&self.phone)
    }

    /// Website, if present and non-empty.
    #[must_use]
    pub fn website_url(&self) -> Option<&str> {
        non_empty(&self.website)
    }

    /// Description, if present and non-empty.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    /// Price band such as `$$`, if present and non-empty.
    #[must_use]
    pub fn price_text(&self) -> Option<&str> {
        non_empty(&self.price)
    }

    /// Rating, if the record has a non-zero one.
    #[must_use]
    pub fn rating_value(&self) -> Option<f64> {
        self.rating.filter(|r| *r != 0.0 && !r.is_nan())
    }

    /// Review count, if the record has at least one review.
    #[must_use]
    pub fn review_count_value(&self) -> Option<u32> {
        self.review_count.filter(|c| *c > 0)
    }

    /// Rating with "no rating" mapped to zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.rating_value().unwrap_or(0.0)
    }

    /// Review count with "no reviews" mapped to zero.
    #[must_use]
    pub fn review_count_or_zero(&self) -> u32 {
        self.review_count_value().unwrap_or(0)
    }

    /// Best image for the listing: thumbnail, else first gallery image, else empty.
    #[must_use]
    pub fn image_url(&self) -> &str {
        if let Some(thumb) = non_empty(&self.thumbnail) {
            return thumb;
        }
        self.images
            .as_deref()
            .and_then(<[ImageRef]>::first)
            .map(|img| img.image.as_str())
            .unwrap_or("")
    }

    /// Whether the record carries any location at all.
    #[must_use]
    pub fn has_location(&self) -> bool {
        self.city_name().is_some() || self.state_name().is_some() || self.address_text().is_some()
    }

    /// Coordinates, when both are present and non-zero.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat != 0.0 && lng != 0.0 => Some((lat, lng)),
            _ => None,
        }
    }
}

// =============================================================================
// LOCATION AGGREGATES
// =============================================================================

/// A city within a state, with the number of listings placed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityData {
    pub name: String,
    pub slug: String,
    pub state: String,
    pub state_slug: String,
    pub plumber_count: usize,
}

/// A state with its cities and the number of listings in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateData {
    pub name: String,
    pub slug: String,
    pub plumber_count: usize,
    pub cities: Vec<CityData>,
}

impl StateData {
    /// Find a city of this state by slug.
    #[must_use]
    pub fn city(&self, city_slug: &str) -> Option<&CityData> {
        self.cities.iter().find(|c| c.slug == city_slug)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the directory layer.
///
/// - No silent failures
/// - Use `Result<T, DirectoryError>` for fallible operations
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A dataset or config file could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A file exceeded the size the loader accepts.
    #[error("File {path} is {size} bytes, maximum is {max}")]
    FileTooLarge { path: String, size: u64, max: u64 },

    /// Neither the primary nor the fallback dataset could be loaded.
    #[error("No dataset available (primary: {primary}, fallback: {fallback})")]
    DatasetUnavailable { primary: String, fallback: String },

    /// A builder that emits absolute URLs was called without a site URL.
    #[error("Site URL is undefined")]
    MissingSiteUrl,

    /// The configured site URL is not an absolute http(s) URL.
    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),

    /// A lookup by slug found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A caller-provided argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plumber_deserializes_dataset_field_names() {
        let json = r#"{
            "id": 7,
            "slug": "ace-plumbing-austin",
            "title": "Ace Plumbing",
            "category": "Plumber",
            "categories": ["Plumber", "Drainage service"],
            "city": "Austin",
            "state": "Texas",
            "rating": 4.8,
            "reviewCount": 120,
            "review_summary": "Fast and friendly",
            "popularTimes": {"Monday": [1, 2]},
            "reviews": [{"Name": "Ann", "Rating": 5, "Description": "Great", "When": "a week ago"}],
            "placeId": "abc123"
        }"#;

        let plumber: Plumber = serde_json::from_str(json).expect("parse");
        assert_eq!(plumber.id, 7);
        assert_eq!(plumber.review_count, Some(120));
        assert_eq!(plumber.review_summary.as_deref(), Some("Fast and friendly"));
        assert_eq!(plumber.reviews.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            plumber.extra.get("placeId"),
            Some(&serde_json::Value::String("abc123".to_string()))
        );
    }

    #[test]
    fn numeric_fields_accept_floats_and_strings() {
        let json = r#"{
            "id": "12",
            "slug": "x",
            "rating": "4.5",
            "reviewCount": 12.0,
            "latitude": "30.25",
            "longitude": -97.75,
            "reviews": [{"Name": "Ann", "Rating": "4"}]
        }"#;
        let plumber: Plumber = serde_json::from_str(json).expect("parse");
        assert_eq!(plumber.id, 12);
        assert_eq!(plumber.rating, Some(4.5));
        assert_eq!(plumber.review_count, Some(12));
        assert_eq!(plumber.latitude, Some(30.25));
        assert_eq!(plumber.longitude, Some(-97.75));
        assert_eq!(plumber.reviews.as_ref().map(|r| r[0].rating), Some(4.0));
    }

    #[test]
    fn unusable_numbers_are_absent() {
        let json = r#"{
            "id": 1.5,
            "slug": "x",
            "rating": "n/a",
            "reviewCount": -3,
            "latitude": true,
            "longitude": {"deg": 1}
        }"#;
        let plumber: Plumber = serde_json::from_str(json).expect("parse");
        assert_eq!(plumber.id, 0);
        assert_eq!(plumber.rating, None);
        assert_eq!(plumber.review_count, None);
        assert_eq!(plumber.coordinates(), None);

        let big: Plumber =
            serde_json::from_str(r#"{"reviewCount": 5000000000}"#).expect("parse");
        assert_eq!(big.review_count, None);
    }

    #[test]
    fn nulls_fall_back_to_defaults() {
        let json = r#"{"id": null, "slug": "x", "title": null, "categories": null, "address": null}"#;
        let plumber: Plumber = serde_json::from_str(json).expect("parse");
        assert_eq!(plumber.id, 0);
        assert!(plumber.title.is_empty());
        assert!(plumber.categories.is_empty());
        assert!(plumber.address.is_none());
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let json = r#"{"slug": "x", "title": "X", "placeId": "p1"}"#;
        let plumber: Plumber = serde_json::from_str(json).expect("parse");
        let out = serde_json::to_string(&plumber).expect("serialize");
        assert!(out.contains("\"placeId\":\"p1\""));
        assert!(!out.contains("\"address\""));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let mut plumber = Plumber::new(1, "a", "A");
        plumber.city = Some(String::new());
        plumber.state = Some("Ohio".to_string());
        assert_eq!(plumber.city_name(), None);
        assert_eq!(plumber.state_name(), Some("Ohio"));
        assert!(plumber.has_location());

        plumber.state = Some(String::new());
        assert!(!plumber.has_location());
    }

    #[test]
    fn zero_rating_counts_as_unrated() {
        let mut plumber = Plumber::new(1, "a", "A");
        plumber.rating = Some(0.0);
        plumber.review_count = Some(0);
        assert_eq!(plumber.rating_value(), None);
        assert_eq!(plumber.review_count_value(), None);
        assert_eq!(plumber.review_count_or_zero(), 0);
    }

    #[test]
    fn image_url_prefers_thumbnail() {
        let mut plumber = Plumber::new(1, "a", "A");
        assert_eq!(plumber.image_url(), "");

        plumber.images = Some(vec![ImageRef {
            title: "front".to_string(),
            image: "https://img/1.jpg".to_string(),
        }]);
        assert_eq!(plumber.image_url(), "https://img/1.jpg");

        plumber.thumbnail = Some("https://img/t.jpg".to_string());
        assert_eq!(plumber.image_url(), "https://img/t.jpg");
    }

    #[test]
    fn coordinates_require_both_values() {
        let mut plumber = Plumber::new(1, "a", "A");
        plumber.latitude = Some(30.2);
        assert_eq!(plumber.coordinates(), None);
        plumber.longitude = Some(-97.7);
        assert_eq!(plumber.coordinates(), Some((30.2, -97.7)));
    }

    #[test]
    fn state_city_lookup() {
        let state = StateData {
            name: "Texas".to_string(),
            slug: "texas".to_string(),
            plumber_count: 2,
            cities: vec![CityData {
                name: "Austin".to_string(),
                slug: "austin".to_string(),
                state: "Texas".to_string(),
                state_slug: "texas".to_string(),
                plumber_count: 2,
            }],
        };
        assert!(state.city("austin").is_some());
        assert!(state.city("dallas").is_none());

        let json = serde_json::to_string(&state).expect("serialize");
        assert!(json.contains("\"plumberCount\":2"));
        assert!(json.contains("\"stateSlug\":\"texas\""));
    }
}
