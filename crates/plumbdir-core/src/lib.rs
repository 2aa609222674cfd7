//! # plumbdir-core
//!
//! The data layer of the plumber directory - THE LOGIC.
//!
//! This crate loads the directory dataset once, answers lookups by slug,
//! state and city, evaluates opening hours and builds everything a page
//! hands to search engines (meta tags, JSON-LD, sitemap, robots).
//!
//! ## Constraints
//!
//! - The dataset is read-only after loading and shared behind an `Arc`
//! - Every derived view (slug index, state groups) is built lazily, once
//! - Output is deterministic: same dataset, same bytes
//! - NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod dataset;
pub mod format;
pub mod grouping;
pub mod hours;
pub mod query;
pub mod seo;
pub mod slug;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CityData, DirectoryError, HoursMap, ImageRef, Plumber, Review, StateData};

// =============================================================================
// RE-EXPORTS: Dataset & Queries
// =============================================================================

pub use dataset::{DataSource, Dataset, DatasetLoader, MAX_DATASET_FILE_SIZE};
pub use format::{Page, format_address, format_categories, paginate};
pub use grouping::{DirectoryStats, cities_by_count, group_states};
pub use query::{DEFAULT_LIMIT, Selection, TOP_RATED_MIN_REVIEWS, select, sort_by_rating};
pub use slug::slugify;

// =============================================================================
// RE-EXPORTS: Hours
// =============================================================================

pub use hours::{DayHours, TimeWindow, format_hours, is_open_at, is_open_at_time, is_open_now};

// =============================================================================
// RE-EXPORTS: SEO (from seo module)
// =============================================================================

pub use seo::{
    Breadcrumb, MetaTags, PageType, SeoProps, Site, build_robots_txt, build_sitemap,
    generate_meta_tags, local_business_list_structured_data, plumber_structured_data,
};
