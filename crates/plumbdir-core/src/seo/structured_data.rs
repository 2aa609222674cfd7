//! schema.org JSON-LD payloads for listing, list and breadcrumb pages.
//!
//! Keys are emitted in a fixed order (`serde_json` is built with
//! `preserve_order`), so the same record always yields the same string.

use super::Site;
use crate::hours::{DayHours, WEEK, day_name};
use crate::types::Plumber;
use serde_json::{Map, Value, json};

/// Listings included in an `ItemList`.
pub const LIST_ITEM_LIMIT: usize = 10;

/// Reviews embedded in a `LocalBusiness`.
pub const REVIEW_LIMIT: usize = 5;

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

impl Breadcrumb {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn postal_address(plumber: &Plumber) -> Option<Value> {
    plumber.address_text().map(|street| {
        json!({
            "@type": "PostalAddress",
            "streetAddress": street,
            "addressLocality": plumber.city_name().unwrap_or_default(),
            "addressRegion": plumber.state_name().unwrap_or_default(),
            "addressCountry": "US",
        })
    })
}

fn aggregate_rating(plumber: &Plumber) -> Option<Value> {
    match (plumber.rating_value(), plumber.review_count_value()) {
        (Some(rating), Some(count)) => Some(json!({
            "@type": "AggregateRating",
            "ratingValue": rating,
            "reviewCount": count,
        })),
        _ => None,
    }
}

fn opening_hours(plumber: &Plumber) -> Vec<Value> {
    let Some(hours) = plumber.hours.as_ref() else {
        return Vec::new();
    };
    WEEK.iter()
        .flat_map(|&day| {
            DayHours::for_day(hours, day)
                .windows()
                .into_iter()
                .map(move |window| {
                    json!({
                        "@type": "OpeningHoursSpecification",
                        "dayOfWeek": format!("https://schema.org/{}", day_name(day)),
                        "opens": window.opens_hhmm(),
                        "closes": window.closes_hhmm(),
                    })
                })
        })
        .collect()
}

fn reviews(plumber: &Plumber) -> Vec<Value> {
    plumber
        .reviews
        .as_deref()
        .unwrap_or_default()
        .iter()
        .take(REVIEW_LIMIT)
        .map(|review| {
            json!({
                "@type": "Review",
                "author": { "@type": "Person", "name": review.name },
                "reviewRating": { "@type": "Rating", "ratingValue": review.rating },
                "reviewBody": review.description,
            })
        })
        .collect()
}

// =============================================================================
// LOCAL BUSINESS
// =============================================================================

/// `LocalBusiness` payload for a listing page.
#[must_use]
pub fn plumber_json_ld(site: &Site, plumber: &Plumber) -> Value {
    let page_url = site.plumber_url(&plumber.slug);
    let description = plumber
        .description_text()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} is a plumber service provider.", plumber.title));

    let mut data = Map::new();
    data.insert("@context".into(), "https://schema.org".into());
    data.insert("@type".into(), "LocalBusiness".into());
    data.insert("@id".into(), page_url.clone().into());
    data.insert("name".into(), plumber.title.clone().into());
    data.insert("image".into(), plumber.image_url().into());
    data.insert("priceRange".into(), plumber.price_text().unwrap_or("$$").into());
    data.insert("telephone".into(), plumber.phone_text().unwrap_or_default().into());
    data.insert(
        "url".into(),
        plumber
            .website_url()
            .map(str::to_string)
            .unwrap_or(page_url)
            .into(),
    );
    data.insert("description".into(), description.into());

    if let Some(address) = postal_address(plumber) {
        data.insert("address".into(), address);
    }

    if let Some((latitude, longitude)) = plumber.coordinates() {
        data.insert(
            "geo".into(),
            json!({
                "@type": "GeoCoordinates",
                "latitude": latitude,
                "longitude": longitude,
            }),
        );
    }

    let hours = opening_hours(plumber);
    if !hours.is_empty() {
        data.insert("openingHoursSpecification".into(), Value::Array(hours));
    }

    if let Some(rating) = aggregate_rating(plumber) {
        data.insert("aggregateRating".into(), rating);
    }

    let reviews = reviews(plumber);
    if !reviews.is_empty() {
        data.insert("review".into(), Value::Array(reviews));
    }

    Value::Object(data)
}

/// [`plumber_json_ld`] as a compact JSON string.
#[must_use]
pub fn plumber_structured_data(site: &Site, plumber: &Plumber) -> String {
    plumber_json_ld(site, plumber).to_string()
}

// =============================================================================
// ITEM LIST
// =============================================================================

/// `ItemList` payload for a state or city page (first ten listings).
#[must_use]
pub fn local_business_list_json_ld<'a, I>(site: &Site, plumbers: I, location: &str) -> Value
where
    I: IntoIterator<Item = &'a Plumber>,
{
    let elements: Vec<Value> = plumbers
        .into_iter()
        .take(LIST_ITEM_LIMIT)
        .enumerate()
        .map(|(i, plumber)| {
            let mut item = Map::new();
            item.insert("@type".into(), "LocalBusiness".into());
            item.insert("name".into(), plumber.title.clone().into());
            item.insert("image".into(), plumber.image_url().into());
            item.insert("telephone".into(), plumber.phone_text().unwrap_or_default().into());
            item.insert("url".into(), site.plumber_url(&plumber.slug).into());
            if let Some(address) = postal_address(plumber) {
                item.insert("address".into(), address);
            }
            if let Some(rating) = aggregate_rating(plumber) {
                item.insert("aggregateRating".into(), rating);
            }
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "item": Value::Object(item),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": format!("Plumbers in {location}"),
        "itemListElement": elements,
    })
}

/// [`local_business_list_json_ld`] as a compact JSON string.
#[must_use]
pub fn local_business_list_structured_data<'a, I>(site: &Site, plumbers: I, location: &str) -> String
where
    I: IntoIterator<Item = &'a Plumber>,
{
    local_business_list_json_ld(site, plumbers, location).to_string()
}

// =============================================================================
// BREADCRUMBS
// =============================================================================

/// `BreadcrumbList` payload; relative URLs are made absolute.
#[must_use]
pub fn breadcrumb_json_ld(site: &Site, items: &[Breadcrumb]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": site.absolute(&crumb.url),
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// [`breadcrumb_json_ld`] as a compact JSON string.
#[must_use]
pub fn breadcrumb_structured_data(site: &Site, items: &[Breadcrumb]) -> String {
    breadcrumb_json_ld(site, items).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageRef, Review};
    use std::collections::BTreeMap;

    fn full_plumber() -> Plumber {
        let mut p = Plumber::new(1, "ace-plumbing", "Ace Plumbing");
        p.address = Some("1 Main St".to_string());
        p.city = Some("Austin".to_string());
        p.state = Some("Texas".to_string());
        p.phone = Some("(512) 555-0100".to_string());
        p.rating = Some(4.5);
        p.review_count = Some(12);
        p.latitude = Some(30.25);
        p.longitude = Some(-97.75);
        p.images = Some(vec![ImageRef {
            title: "Van".to_string(),
            image: "https://img.example.com/van.jpg".to_string(),
        }]);
        let mut hours = BTreeMap::new();
        hours.insert("Monday".to_string(), vec!["8 AM–6 PM".to_string()]);
        hours.insert("Saturday".to_string(), vec!["Open 24 hours".to_string()]);
        hours.insert("Sunday".to_string(), vec!["Closed".to_string()]);
        p.hours = Some(hours);
        p.reviews = Some(
            (0..7)
                .map(|i| Review {
                    name: format!("Reviewer {i}"),
                    rating: 5.0,
                    description: "Great".to_string(),
                    ..Review::default()
                })
                .collect(),
        );
        p
    }

    #[test]
    fn minimal_listing_uses_defaults() {
        let p = Plumber::new(2, "bare", "Bare Pipes");
        let data = plumber_json_ld(&Site::default(), &p);

        assert_eq!(data["@id"], "https://plumbernearme.shop/plumber/bare");
        assert_eq!(data["url"], "https://plumbernearme.shop/plumber/bare");
        assert_eq!(data["priceRange"], "$$");
        assert_eq!(data["telephone"], "");
        assert_eq!(data["image"], "");
        assert_eq!(data["description"], "Bare Pipes is a plumber service provider.");
        assert!(data.get("address").is_none());
        assert!(data.get("geo").is_none());
        assert!(data.get("openingHoursSpecification").is_none());
        assert!(data.get("aggregateRating").is_none());
        assert!(data.get("review").is_none());
    }

    #[test]
    fn full_listing() {
        let data = plumber_json_ld(&Site::default(), &full_plumber());

        assert_eq!(data["image"], "https://img.example.com/van.jpg");
        assert_eq!(data["address"]["addressLocality"], "Austin");
        assert_eq!(data["address"]["addressCountry"], "US");
        assert_eq!(data["geo"]["latitude"], 30.25);
        assert_eq!(data["aggregateRating"]["reviewCount"], 12);
        assert_eq!(data["review"].as_array().map(Vec::len), Some(REVIEW_LIMIT));
        assert_eq!(data["review"][0]["author"]["name"], "Reviewer 0");
    }

    #[test]
    fn opening_hours_in_week_order() {
        let data = plumber_json_ld(&Site::default(), &full_plumber());
        let hours = data["openingHoursSpecification"].as_array().expect("hours");

        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0]["dayOfWeek"], "https://schema.org/Monday");
        assert_eq!(hours[0]["opens"], "08:00");
        assert_eq!(hours[0]["closes"], "18:00");
        assert_eq!(hours[1]["dayOfWeek"], "https://schema.org/Saturday");
        assert_eq!(hours[1]["opens"], "00:00");
        assert_eq!(hours[1]["closes"], "23:59");
    }

    #[test]
    fn website_overrides_page_url() {
        let mut p = Plumber::new(3, "web", "Web Plumbing");
        p.website = Some("https://webplumbing.example".to_string());
        let data = plumber_json_ld(&Site::default(), &p);
        assert_eq!(data["url"], "https://webplumbing.example");
        assert_eq!(data["@id"], "https://plumbernearme.shop/plumber/web");
    }

    #[test]
    fn string_output_keeps_key_order() {
        let json = plumber_structured_data(&Site::default(), &Plumber::new(4, "k", "K"));
        assert!(json.starts_with(
            "{\"@context\":\"https://schema.org\",\"@type\":\"LocalBusiness\",\"@id\":"
        ));
    }

    #[test]
    fn item_list_caps_at_ten() {
        let plumbers: Vec<Plumber> = (0..15)
            .map(|i| Plumber::new(i, format!("p-{i}"), format!("P {i}")))
            .collect();
        let data = local_business_list_json_ld(&Site::default(), &plumbers, "Austin, Texas");
        let items = data["itemListElement"].as_array().expect("items");

        assert_eq!(data["name"], "Plumbers in Austin, Texas");
        assert_eq!(items.len(), LIST_ITEM_LIMIT);
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[9]["position"], 10);
        assert_eq!(items[3]["item"]["url"], "https://plumbernearme.shop/plumber/p-3");
        assert!(items[0]["item"].get("address").is_none());
    }

    #[test]
    fn item_list_includes_optional_blocks() {
        let plumbers = vec![full_plumber()];
        let data = local_business_list_json_ld(&Site::default(), &plumbers, "Texas");
        let item = &data["itemListElement"][0]["item"];
        assert_eq!(item["address"]["streetAddress"], "1 Main St");
        assert_eq!(item["aggregateRating"]["ratingValue"], 4.5);
    }

    #[test]
    fn breadcrumbs() {
        let items = vec![
            Breadcrumb::new("Home", "/"),
            Breadcrumb::new("Texas", "/state/texas"),
            Breadcrumb::new("External", "https://other.example/x"),
        ];
        let data = breadcrumb_json_ld(&Site::default(), &items);
        let list = data["itemListElement"].as_array().expect("list");

        assert_eq!(data["@type"], "BreadcrumbList");
        assert_eq!(list[0]["item"], "https://plumbernearme.shop/");
        assert_eq!(list[1]["position"], 2);
        assert_eq!(list[1]["item"], "https://plumbernearme.shop/state/texas");
        assert_eq!(list[2]["item"], "https://other.example/x");
    }
}
