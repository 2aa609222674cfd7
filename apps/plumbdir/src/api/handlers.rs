//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        CityPageResponse, ErrorResponse, HealthResponse, LimitParams, PageParams,
        PlumberListResponse, PlumberResponse, SearchParams, StatePageResponse, StatesResponse,
        StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use crate::pages::{
    city_breadcrumbs, city_meta, plumber_breadcrumbs, plumber_meta, state_breadcrumbs, state_meta,
};
use plumbdir_core::seo::{
    self, MetaTags, breadcrumb_json_ld, local_business_list_json_ld, plumber_json_ld,
};
use plumbdir_core::{
    DEFAULT_LIMIT, DirectoryError, cities_by_count, format_address, format_categories,
    format_hours, is_open_now, paginate,
};

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("Not found: {}", what))),
    )
        .into_response()
}

fn meta_json(tags: &MetaTags) -> serde_json::Value {
    serde_json::to_value(tags).unwrap_or_default()
}

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Dataset size and origin.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.dataset.stats();
    let response = StatusResponse {
        plumber_count: stats.plumber_count,
        state_count: stats.state_count,
        city_count: stats.city_count,
        without_location: stats.without_location,
        source: state.source.to_string(),
        site_url: state.config.site_url().map(str::to_string),
    };
    (StatusCode::OK, Json(response))
}

// =============================================================================
// CRAWLER FILES
// =============================================================================

fn crawler_error(e: &DirectoryError) -> Response {
    tracing::error!(error = %e, "cannot render crawler file");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

/// `robots.txt`
pub async fn robots_handler(State(state): State<AppState>) -> Response {
    match seo::build_robots_txt(state.config.site_url()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => crawler_error(&e),
    }
}

/// `sitemap.xml`, dated today.
pub async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let today = chrono::Local::now().date_naive();
    match seo::build_sitemap(
        state.config.site_url(),
        &state.dataset,
        today,
        state.config.sitemap.static_pages.as_slice(),
    ) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            body,
        )
            .into_response(),
        Err(e) => crawler_error(&e),
    }
}

// =============================================================================
// STATES / CITIES
// =============================================================================

/// All states with their cities.
pub async fn states_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatesResponse {
            success: true,
            states: state.dataset.states().to_vec(),
        }),
    )
}

/// One state page.
pub async fn state_handler(
    State(state): State<AppState>,
    Path(state_slug): Path<String>,
    Query(paging): Query<PageParams>,
) -> Response {
    let Some(data) = state.dataset.state_by_slug(&state_slug) else {
        return not_found(&format!("state '{}'", state_slug));
    };

    let plumbers = state.dataset.plumbers_in_state(&state_slug);
    let page = paginate(&plumbers, paging.page(), paging.per_page());
    let response = StatePageResponse {
        success: true,
        state: data.clone(),
        cities: cities_by_count(data).into_iter().cloned().collect(),
        plumbers: PlumberListResponse::from_page(page),
        meta: meta_json(&state_meta(&state.site, data)),
        structured_data: vec![
            local_business_list_json_ld(&state.site, plumbers.iter().copied(), &data.name),
            breadcrumb_json_ld(&state.site, &state_breadcrumbs(data)),
        ],
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// One city page.
pub async fn city_handler(
    State(state): State<AppState>,
    Path((state_slug, city_slug)): Path<(String, String)>,
    Query(paging): Query<PageParams>,
) -> Response {
    let Some(city) = state.dataset.city_by_slug(&state_slug, &city_slug) else {
        return not_found(&format!("city '{}/{}'", state_slug, city_slug));
    };

    let plumbers = state.dataset.plumbers_in_city(&state_slug, &city_slug);
    let page = paginate(&plumbers, paging.page(), paging.per_page());
    let location = format!("{}, {}", city.name, city.state);
    let response = CityPageResponse {
        success: true,
        city: city.clone(),
        plumbers: PlumberListResponse::from_page(page),
        meta: meta_json(&city_meta(&state.site, city)),
        structured_data: vec![
            local_business_list_json_ld(&state.site, plumbers.iter().copied(), &location),
            breadcrumb_json_ld(&state.site, &city_breadcrumbs(city)),
        ],
    };
    (StatusCode::OK, Json(response)).into_response()
}

// =============================================================================
// LISTINGS
// =============================================================================

/// One listing with formatted fields and its open-now flag.
pub async fn plumber_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let Some(plumber) = state.dataset.plumber_by_slug(&slug) else {
        return not_found(&format!("plumber '{}'", slug));
    };

    let response = PlumberResponse {
        success: true,
        plumber: plumber.clone(),
        address: format_address(plumber),
        categories: format_categories(plumber),
        hours: format_hours(plumber),
        open_now: is_open_now(plumber),
        meta: meta_json(&plumber_meta(&state.site, plumber)),
        breadcrumbs: breadcrumb_json_ld(&state.site, &plumber_breadcrumbs(plumber)),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// `LocalBusiness` JSON-LD for one listing.
pub async fn plumber_structured_data_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    match state.dataset.plumber_by_slug(&slug) {
        Some(plumber) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/ld+json")],
            Json(plumber_json_ld(&state.site, plumber)),
        )
            .into_response(),
        None => not_found(&format!("plumber '{}'", slug)),
    }
}

/// Title search, paginated.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let paging = params.paging();
    let results = state.dataset.search(params.q.trim());
    let page = paginate(&results, paging.page(), paging.per_page());
    (StatusCode::OK, Json(PlumberListResponse::from_page(page)))
}

/// Best-rated listings.
pub async fn top_rated_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let ranked = state.dataset.top_rated(params.limit(DEFAULT_LIMIT));
    (StatusCode::OK, Json(PlumberListResponse::all(&ranked)))
}

/// Most-reviewed listings.
pub async fn most_reviewed_handler(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let ranked = state.dataset.most_reviewed(params.limit(DEFAULT_LIMIT));
    (StatusCode::OK, Json(PlumberListResponse::all(&ranked)))
}

/// Listings that cannot be placed on any state or city page.
pub async fn unlisted_handler(State(state): State<AppState>) -> impl IntoResponse {
    let unlisted = state.dataset.plumbers_missing_city_or_state();
    (StatusCode::OK, Json(PlumberListResponse::all(&unlisted)))
}
