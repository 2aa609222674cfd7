//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use plumbdir::api::{
    DEFAULT_PER_PAGE, ErrorResponse, HealthResponse, LimitParams, MAX_PAGE_SIZE, PageParams,
    PlumberListResponse, PlumberSummary, SearchParams,
};
use plumbdir_core::{Plumber, paginate};

fn plumber(slug: &str) -> Plumber {
    let mut p = Plumber::new(1, slug, "Ace Plumbing");
    p.city = Some("Austin".to_string());
    p.state = Some("Texas".to_string());
    p.rating = Some(4.8);
    p.review_count = Some(214);
    p.phone = Some("(512) 555-0100".to_string());
    p
}

// =============================================================================
// HEALTH / ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

#[test]
fn test_error_response_serialization() {
    let json = serde_json::to_string(&ErrorResponse::new("Not found: plumber 'x'")).unwrap();
    assert_eq!(json, r#"{"success":false,"error":"Not found: plumber 'x'"}"#);
}

// =============================================================================
// QUERY PARAMETER TESTS
// =============================================================================

#[test]
fn test_page_params_defaults() {
    let params = PageParams::default();
    assert_eq!(params.page(), 1);
    assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
}

#[test]
fn test_page_params_clamped() {
    let params = PageParams {
        page: Some(0),
        per_page: Some(5000),
    };
    assert_eq!(params.page(), 1);
    assert_eq!(params.per_page(), MAX_PAGE_SIZE);

    let params = PageParams {
        page: Some(3),
        per_page: Some(0),
    };
    assert_eq!(params.page(), 3);
    assert_eq!(params.per_page(), 1);
}

#[test]
fn test_search_params_missing_query() {
    let params: SearchParams = serde_json::from_str(r#"{"page":2}"#).unwrap();
    assert_eq!(params.q, "");
    assert_eq!(params.paging().page(), 2);
}

#[test]
fn test_limit_params() {
    assert_eq!(LimitParams::default().limit(10), 10);
    assert_eq!(LimitParams { limit: Some(0) }.limit(10), 1);
    assert_eq!(LimitParams { limit: Some(500) }.limit(10), MAX_PAGE_SIZE);
}

// =============================================================================
// LISTING RESPONSE TESTS
// =============================================================================

#[test]
fn test_summary_fields() {
    let summary = PlumberSummary::from(&plumber("ace"));
    assert_eq!(summary.address, "Austin, Texas");
    assert_eq!(summary.categories, "Plumber");
    assert_eq!(summary.review_count, Some(214));
    assert_eq!(summary.open_now, None);
    assert_eq!(summary.image, "");
}

#[test]
fn test_summary_uses_camel_case() {
    let json = serde_json::to_value(PlumberSummary::from(&plumber("ace"))).unwrap();
    assert_eq!(json["reviewCount"], 214);
    assert_eq!(json["openNow"], serde_json::Value::Null);
    assert!(json.get("review_count").is_none());
}

#[test]
fn test_list_response_from_page() {
    let records = [plumber("a"), plumber("b"), plumber("c")];
    let refs: Vec<&Plumber> = records.iter().collect();

    let list = PlumberListResponse::from_page(paginate(&refs, 2, 2));
    assert_eq!(list.total_items, 3);
    assert_eq!(list.total_pages, 2);
    assert_eq!(list.current_page, 2);
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].slug, "c");

    let json = serde_json::to_value(&list).unwrap();
    assert_eq!(json["totalItems"], 3);
    assert_eq!(json["currentPage"], 2);
}

#[test]
fn test_list_response_all() {
    let empty = PlumberListResponse::all(&[]);
    assert_eq!(empty.total_pages, 0);
    assert_eq!(empty.current_page, 1);

    let records = [plumber("a")];
    let refs: Vec<&Plumber> = records.iter().collect();
    let one = PlumberListResponse::all(&refs);
    assert_eq!(one.total_items, 1);
    assert_eq!(one.total_pages, 1);
}
