//! # Query Module
//!
//! Lookup, filter and ranking helpers over a slice of directory records.
//!
//! Every helper borrows from the input and never reorders it in place.
//! Name-keyed filters compare case-insensitively; slug-keyed filters compare
//! `slugify(name)` against the requested slug.

use crate::slug::slugify;
use crate::types::Plumber;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Default size of ranked lists.
pub const DEFAULT_LIMIT: usize = 10;

/// Review count a listing needs before it can rank as "top rated".
pub const TOP_RATED_MIN_REVIEWS: u32 = 5;

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// =============================================================================
// NAME-KEYED FILTERS
// =============================================================================

/// Records whose state matches `state`, ignoring case.
#[must_use]
pub fn by_state<'a>(plumbers: &'a [Plumber], state: &str) -> Vec<&'a Plumber> {
    plumbers
        .iter()
        .filter(|p| p.state_name().is_some_and(|s| same_name(s, state)))
        .collect()
}

/// Records whose city matches `city`, optionally restricted to `state`.
#[must_use]
pub fn by_city<'a>(plumbers: &'a [Plumber], city: &str, state: Option<&str>) -> Vec<&'a Plumber> {
    plumbers
        .iter()
        .filter(|p| p.city_name().is_some_and(|c| same_name(c, city)))
        .filter(|p| match state.filter(|s| !s.is_empty()) {
            None => true,
            Some(state) => p.state_name().is_some_and(|s| same_name(s, state)),
        })
        .collect()
}

/// First record with exactly this slug.
#[must_use]
pub fn by_slug<'a>(plumbers: &'a [Plumber], slug: &str) -> Option<&'a Plumber> {
    plumbers.iter().find(|p| p.slug == slug)
}

/// Sorted, deduplicated state names.
#[must_use]
pub fn unique_states(plumbers: &[Plumber]) -> Vec<String> {
    plumbers
        .iter()
        .filter_map(Plumber::state_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// State name → sorted, deduplicated city names.
///
/// Only records carrying both a state and a city contribute.
#[must_use]
pub fn unique_states_cities(plumbers: &[Plumber]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for plumber in plumbers {
        if let (Some(state), Some(city)) = (plumber.state_name(), plumber.city_name()) {
            grouped.entry(state).or_default().insert(city);
        }
    }
    grouped
        .into_iter()
        .map(|(state, cities)| {
            (
                state.to_string(),
                cities.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

/// Records with no city, no state and no address.
#[must_use]
pub fn without_location(plumbers: &[Plumber]) -> Vec<&Plumber> {
    plumbers.iter().filter(|p| !p.has_location()).collect()
}

/// Records that cannot be placed on a city page (missing state or city).
#[must_use]
pub fn missing_city_or_state(plumbers: &[Plumber]) -> Vec<&Plumber> {
    plumbers
        .iter()
        .filter(|p| p.state_name().is_none() || p.city_name().is_none())
        .collect()
}

// =============================================================================
// SLUG-KEYED FILTERS
// =============================================================================

/// Records whose state slugifies to `state_slug`.
#[must_use]
pub fn in_state<'a>(plumbers: &'a [Plumber], state_slug: &str) -> Vec<&'a Plumber> {
    plumbers
        .iter()
        .filter(|p| p.state_name().is_some_and(|s| slugify(s) == state_slug))
        .collect()
}

/// Records whose state and city slugify to the given slugs.
#[must_use]
pub fn in_city<'a>(plumbers: &'a [Plumber], state_slug: &str, city_slug: &str) -> Vec<&'a Plumber> {
    plumbers
        .iter()
        .filter(|p| match (p.state_name(), p.city_name()) {
            (Some(state), Some(city)) => slugify(state) == state_slug && slugify(city) == city_slug,
            _ => false,
        })
        .collect()
}

// =============================================================================
// SEARCH & RANKING
// =============================================================================

/// Case-insensitive substring search over titles. An empty query matches nothing.
#[must_use]
pub fn search<'a>(plumbers: &'a [Plumber], query: &str) -> Vec<&'a Plumber> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    plumbers
        .iter()
        .filter(|p| !p.title.is_empty() && p.title.to_lowercase().contains(&needle))
        .collect()
}

/// Rating descending, then review count descending.
fn rating_order(a: &Plumber, b: &Plumber) -> Ordering {
    b.rating_or_zero()
        .total_cmp(&a.rating_or_zero())
        .then_with(|| b.review_count_or_zero().cmp(&a.review_count_or_zero()))
}

/// Records ordered by rating (unrated last), ties broken by review count.
///
/// The sort is stable, so equal records keep dataset order.
#[must_use]
pub fn sort_by_rating<'a, I>(plumbers: I) -> Vec<&'a Plumber>
where
    I: IntoIterator<Item = &'a Plumber>,
{
    let mut sorted: Vec<&Plumber> = plumbers.into_iter().collect();
    sorted.sort_by(|a, b| rating_order(a, b));
    sorted
}

/// Best-rated records with more than five reviews.
#[must_use]
pub fn top_rated(plumbers: &[Plumber], limit: usize) -> Vec<&Plumber> {
    let eligible = plumbers.iter().filter(|p| {
        p.rating_value().is_some() && p.review_count_or_zero() > TOP_RATED_MIN_REVIEWS
    });
    let mut ranked = sort_by_rating(eligible);
    ranked.truncate(limit);
    ranked
}

/// Records with the most reviews.
#[must_use]
pub fn most_reviewed(plumbers: &[Plumber], limit: usize) -> Vec<&Plumber> {
    let mut ranked: Vec<&Plumber> = plumbers
        .iter()
        .filter(|p| p.review_count_value().is_some())
        .collect();
    ranked.sort_by(|a, b| b.review_count_or_zero().cmp(&a.review_count_or_zero()));
    ranked.truncate(limit);
    ranked
}

// =============================================================================
// SELECTION
// =============================================================================

/// A named list of records, as shown on one directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every record, in dataset order.
    All,
    /// Records in a state, by state slug.
    State(String),
    /// Records in a city, by state and city slug.
    City { state: String, city: String },
    /// Title search.
    Search(String),
    /// Best-rated records.
    TopRated(usize),
    /// Most-reviewed records.
    MostReviewed(usize),
    /// Records with no location information.
    WithoutLocation,
}

impl Selection {
    /// State selection helper.
    #[must_use]
    pub fn state(slug: impl Into<String>) -> Self {
        Self::State(slug.into())
    }

    /// City selection helper.
    #[must_use]
    pub fn city(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self::City {
            state: state.into(),
            city: city.into(),
        }
    }

    /// Search selection helper.
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self::Search(query.into())
    }
}

/// Apply a selection to a slice of records.
#[must_use]
pub fn select<'a>(plumbers: &'a [Plumber], selection: &Selection) -> Vec<&'a Plumber> {
    match selection {
        Selection::All => plumbers.iter().collect(),
        Selection::State(slug) => in_state(plumbers, slug),
        Selection::City { state, city } => in_city(plumbers, state, city),
        Selection::Search(query) => search(plumbers, query),
        Selection::TopRated(limit) => top_rated(plumbers, *limit),
        Selection::MostReviewed(limit) => most_reviewed(plumbers, *limit),
        Selection::WithoutLocation => without_location(plumbers),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plumber(
        id: u64,
        title: &str,
        city: Option<&str>,
        state: Option<&str>,
        rating: Option<f64>,
        reviews: Option<u32>,
    ) -> Plumber {
        let mut p = Plumber::new(id, slugify(title), title);
        p.city = city.map(str::to_string);
        p.state = state.map(str::to_string);
        p.rating = rating;
        p.review_count = reviews;
        p
    }

    fn sample() -> Vec<Plumber> {
        vec![
            plumber(1, "Ace Plumbing", Some("Austin"), Some("Texas"), Some(4.8), Some(120)),
            plumber(2, "Bay Drains", Some("Oakland"), Some("California"), Some(4.9), Some(3)),
            plumber(3, "Cedar Pipes", Some("austin"), Some("texas"), Some(4.8), Some(300)),
            plumber(4, "Delta Rooter", Some("Dallas"), Some("Texas"), None, None),
            plumber(5, "Echo Heating", None, None, Some(3.5), Some(40)),
            plumber(6, "Fox Plumbing", Some("San Jose"), Some("California"), Some(4.2), Some(6)),
        ]
    }

    fn ids(list: &[&Plumber]) -> Vec<u64> {
        list.iter().map(|p| p.id).collect()
    }

    #[test]
    fn state_filter_ignores_case() {
        let data = sample();
        assert_eq!(ids(&by_state(&data, "TEXAS")), vec![1, 3, 4]);
        assert!(by_state(&data, "Nevada").is_empty());
    }

    #[test]
    fn city_filter_with_optional_state() {
        let data = sample();
        assert_eq!(ids(&by_city(&data, "Austin", None)), vec![1, 3]);
        assert_eq!(ids(&by_city(&data, "austin", Some("Texas"))), vec![1, 3]);
        assert!(by_city(&data, "Austin", Some("California")).is_empty());
        assert_eq!(ids(&by_city(&data, "Austin", Some(""))), vec![1, 3]);
    }

    #[test]
    fn slug_lookup_returns_first_match() {
        let mut data = sample();
        data.push(plumber(7, "Ace Plumbing", None, None, None, None));
        assert_eq!(by_slug(&data, "ace-plumbing").map(|p| p.id), Some(1));
        assert!(by_slug(&data, "missing").is_none());
    }

    #[test]
    fn unique_states_sorted_and_deduped() {
        let data = sample();
        assert_eq!(unique_states(&data), vec!["California", "Texas", "texas"]);
    }

    #[test]
    fn unique_cities_per_state() {
        let data = sample();
        let grouped = unique_states_cities(&data);
        assert_eq!(
            grouped.get("California"),
            Some(&vec!["Oakland".to_string(), "San Jose".to_string()])
        );
        assert_eq!(
            grouped.get("Texas"),
            Some(&vec!["Austin".to_string(), "Dallas".to_string()])
        );
        assert_eq!(grouped.len(), 3);
    }

    #[test]
    fn location_filters() {
        let mut data = sample();
        let mut half = plumber(8, "Half Placed", None, Some("Ohio"), None, None);
        half.address = Some("9 Elm St".to_string());
        data.push(half);

        assert_eq!(ids(&without_location(&data)), vec![5]);
        assert_eq!(ids(&missing_city_or_state(&data)), vec![5, 8]);
    }

    #[test]
    fn slug_filters() {
        let data = sample();
        assert_eq!(ids(&in_state(&data, "texas")), vec![1, 3, 4]);
        assert_eq!(ids(&in_city(&data, "texas", "austin")), vec![1, 3]);
        assert_eq!(ids(&in_city(&data, "california", "san-jose")), vec![6]);
        assert!(in_city(&data, "texas", "san-jose").is_empty());
    }

    #[test]
    fn search_titles() {
        let data = sample();
        assert_eq!(ids(&search(&data, "PLUMBING")), vec![1, 6]);
        assert!(search(&data, "").is_empty());
        assert!(search(&data, "zzz").is_empty());
    }

    #[test]
    fn rating_sort_breaks_ties_by_reviews() {
        let data = sample();
        assert_eq!(ids(&sort_by_rating(&data)), vec![2, 3, 1, 6, 5, 4]);
    }

    #[test]
    fn top_rated_requires_more_than_five_reviews() {
        let data = sample();
        assert_eq!(ids(&top_rated(&data, 10)), vec![3, 1, 6, 5]);
        assert_eq!(ids(&top_rated(&data, 2)), vec![3, 1]);
    }

    #[test]
    fn most_reviewed_skips_unreviewed() {
        let data = sample();
        assert_eq!(ids(&most_reviewed(&data, 10)), vec![3, 1, 5, 6, 2]);
        assert_eq!(ids(&most_reviewed(&data, 1)), vec![3]);
    }

    #[test]
    fn selection_dispatch() {
        let data = sample();
        assert_eq!(select(&data, &Selection::All).len(), 6);
        assert_eq!(ids(&select(&data, &Selection::state("california"))), vec![2, 6]);
        assert_eq!(ids(&select(&data, &Selection::city("texas", "dallas"))), vec![4]);
        assert_eq!(ids(&select(&data, &Selection::search("bay"))), vec![2]);
        assert_eq!(ids(&select(&data, &Selection::TopRated(1))), vec![3]);
        assert_eq!(ids(&select(&data, &Selection::MostReviewed(2))), vec![3, 1]);
        assert_eq!(ids(&select(&data, &Selection::WithoutLocation)), vec![5]);
    }
}
