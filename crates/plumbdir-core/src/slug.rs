//! # Slugs
//!
//! URL-safe lowercase hyphenated identifiers derived from display names.
//! State and city pages are keyed by these, so every grouping and lookup
//! in the crate goes through [`slugify`].

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").expect("non-word pattern"));

static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("hyphen-run pattern"));

/// Convert a display name into a slug.
///
/// Lowercases, turns whitespace runs into `-`, drops everything outside
/// `[a-z0-9_-]`, collapses repeated hyphens and trims them from both ends.
///
/// ```
/// use plumbdir_core::slugify;
///
/// assert_eq!(slugify("New York"), "new-york");
/// assert_eq!(slugify("  Coeur d'Alene "), "coeur-dalene");
/// ```
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    let cleaned = NON_WORD.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

// =============================================================================
// TESTS
// =============================================================================
