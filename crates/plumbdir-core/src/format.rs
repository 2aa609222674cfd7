//! # Display Helpers
//!
//! Small formatting helpers used by listing pages and the CLI.

use crate::types::Plumber;
use serde::Serialize;

/// Readable address: the street address, else `"City, State"`.
#[must_use]
pub fn format_address(plumber: &Plumber) -> String {
    if let Some(address) = plumber.address_text() {
        return address.to_string();
    }
    [plumber.city_name(), plumber.state_name()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Categories joined with `", "`, else the primary category, else `"Plumber"`.
#[must_use]
pub fn format_categories(plumber: &Plumber) -> String {
    if !plumber.categories.is_empty() {
        return plumber.categories.join(", ");
    }
    if !plumber.category.is_empty() {
        return plumber.category.clone();
    }
    "Plumber".to_string()
}

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of a larger list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Slice out a 1-based page.
///
/// Page 0 is treated as page 1. A `per_page` of zero yields an empty page
/// and zero pages. Pages past the end are empty but echo the requested page.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let current_page = page.max(1);
    let total_items = items.len();

    if per_page == 0 {
        return Page {
            items: Vec::new(),
            total_items,
            total_pages: 0,
            current_page,
        };
    }

    let start = (current_page - 1).saturating_mul(per_page);
    let page_items = items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect();

    Page {
        items: page_items,
        total_items,
        total_pages: total_items.div_ceil(per_page),
        current_page,
    }
}

// =============================================================================
// TESTS
// =============================================================================
