//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use plumbdir_core::{
    CityData, Page, Plumber, StateData, format_address, format_categories, is_open_now,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page size when `per_page` is not given.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Largest accepted `per_page` and `limit`.
pub const MAX_PAGE_SIZE: usize = 100;

// =============================================================================
// HEALTH / STATUS
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Directory status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub plumber_count: usize,
    pub state_count: usize,
    pub city_count: usize,
    pub without_location: usize,
    pub source: String,
    pub site_url: Option<String>,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// =============================================================================
// QUERY PARAMETERS
// =============================================================================

/// `?page=&per_page=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageParams {
    /// Requested page, 1-based.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// `?q=&page=&per_page=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl SearchParams {
    #[must_use]
    pub fn paging(&self) -> PageParams {
        PageParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// `?limit=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

impl LimitParams {
    /// Requested limit, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

/// The fields a list page shows for one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlumberSummary {
    pub slug: String,
    pub title: String,
    pub address: String,
    pub categories: String,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub image: String,
    pub open_now: Option<bool>,
}

impl From<&Plumber> for PlumberSummary {
    fn from(p: &Plumber) -> Self {
        Self {
            slug: p.slug.clone(),
            title: p.title.clone(),
            address: format_address(p),
            categories: format_categories(p),
            phone: p.phone_text().map(str::to_string),
            rating: p.rating_value(),
            review_count: p.review_count_value(),
            image: p.image_url().to_string(),
            open_now: is_open_now(p),
        }
    }
}

/// A page of listing summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlumberListResponse {
    pub success: bool,
    pub items: Vec<PlumberSummary>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl PlumberListResponse {
    /// Wrap an already paginated list.
    #[must_use]
    pub fn from_page(page: Page<&Plumber>) -> Self {
        Self {
            success: true,
            items: page.items.into_iter().map(PlumberSummary::from).collect(),
            total_items: page.total_items,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }

    /// Single-page list (rankings, unlisted).
    #[must_use]
    pub fn all(plumbers: &[&Plumber]) -> Self {
        Self {
            success: true,
            items: plumbers.iter().copied().map(PlumberSummary::from).collect(),
            total_items: plumbers.len(),
            total_pages: usize::from(!plumbers.is_empty()),
            current_page: 1,
        }
    }
}

/// A single listing with its display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlumberResponse {
    pub success: bool,
    pub plumber: Plumber,
    pub address: String,
    pub categories: String,
    pub hours: BTreeMap<String, String>,
    pub open_now: Option<bool>,
    pub meta: serde_json::Value,
    pub breadcrumbs: serde_json::Value,
}

// =============================================================================
// STATES / CITIES
// =============================================================================

/// The state index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesResponse {
    pub success: bool,
    pub states: Vec<StateData>,
}

/// A state page: the state, its cities (largest first) and a page of listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePageResponse {
    pub success: bool,
    pub state: StateData,
    pub cities: Vec<CityData>,
    pub plumbers: PlumberListResponse,
    pub meta: serde_json::Value,
    pub structured_data: Vec<serde_json::Value>,
}

/// A city page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPageResponse {
    pub success: bool,
    pub city: CityData,
    pub plumbers: PlumberListResponse,
    pub meta: serde_json::Value,
    pub structured_data: Vec<serde_json::Value>,
}
