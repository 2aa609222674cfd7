//! # State / City Grouping
//!
//! Builds the aggregate view behind the state index and city pages.
//!
//! Records are grouped by `slugify(state)`, so `"Texas"` and `"texas"` land
//! on the same page. The display name of a group is taken from the first
//! record seen. Cities keep first-seen order inside their state; states are
//! sorted by name.

use crate::slug::slugify;
use crate::types::{CityData, Plumber, StateData};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Insertion-ordered grouping keyed by slug.
struct Groups<'a> {
    index: BTreeMap<String, usize>,
    groups: Vec<(String, Vec<&'a Plumber>)>,
}

impl<'a> Groups<'a> {
    fn new() -> Self {
        Self {
            index: BTreeMap::new(),
            groups: Vec::new(),
        }
    }

    fn push(&mut self, slug: String, plumber: &'a Plumber) {
        match self.index.get(&slug) {
            Some(&i) => self.groups[i].1.push(plumber),
            None => {
                self.index.insert(slug.clone(), self.groups.len());
                self.groups.push((slug, vec![plumber]));
            }
        }
    }
}

/// State names compare case-insensitively, then bytewise.
fn state_name_order(a: &StateData, b: &StateData) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Group records into states and their cities.
///
/// Records without a state are left out. A state's `plumber_count` counts all
/// of its records, including those without a city.
#[must_use]
pub fn group_states(plumbers: &[Plumber]) -> Vec<StateData> {
    let mut states = Groups::new();
    for plumber in plumbers {
        if let Some(state) = plumber.state_name() {
            let slug = slugify(state);
            if !slug.is_empty() {
                states.push(slug, plumber);
            }
        }
    }

    let mut result: Vec<StateData> = states
        .groups
        .into_iter()
        .map(|(state_slug, members)| build_state(state_slug, &members))
        .collect();

    result.sort_by(state_name_order);
    result
}

fn build_state(state_slug: String, members: &[&Plumber]) -> StateData {
    let name = members
        .first()
        .and_then(|p| p.state_name())
        .unwrap_or_default()
        .to_string();

    let mut cities = Groups::new();
    for plumber in members {
        if let Some(city) = plumber.city_name() {
            let slug = slugify(city);
            if !slug.is_empty() {
                cities.push(slug, plumber);
            }
        }
    }

    let cities = cities
        .groups
        .into_iter()
        .map(|(city_slug, city_members)| CityData {
            name: city_members
                .first()
                .and_then(|p| p.city_name())
                .unwrap_or_default()
                .to_string(),
            slug: city_slug,
            state: name.clone(),
            state_slug: state_slug.clone(),
            plumber_count: city_members.len(),
        })
        .collect();

    StateData {
        name,
        slug: state_slug,
        plumber_count: members.len(),
        cities,
    }
}

/// Cities of a state ordered by listing count, largest first.
///
/// Ties keep first-seen order.
#[must_use]
pub fn cities_by_count(state: &StateData) -> Vec<&CityData> {
    let mut cities: Vec<&CityData> = state.cities.iter().collect();
    cities.sort_by(|a, b| b.plumber_count.cmp(&a.plumber_count));
    cities
}

// =============================================================================
// DIRECTORY STATS
// =============================================================================

/// Headline numbers for the whole directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub plumber_count: usize,
    pub state_count: usize,
    pub city_count: usize,
    pub without_location: usize,
}

impl DirectoryStats {
    /// Compute stats from records and their grouped states.
    #[must_use]
    pub fn compute(plumbers: &[Plumber], states: &[StateData]) -> Self {
        Self {
            plumber_count: plumbers.len(),
            state_count: states.len(),
            city_count: states.iter().map(|s| s.cities.len()).sum(),
            without_location: plumbers.iter().filter(|p| !p.has_location()).count(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: u64, city: Option<&str>, state: Option<&str>) -> Plumber {
        let mut p = Plumber::new(id, format!("p-{id}"), format!("P {id}"));
        p.city = city.map(str::to_string);
        p.state = state.map(str::to_string);
        p
    }

    fn sample() -> Vec<Plumber> {
        vec![
            at(1, Some("Austin"), Some("Texas")),
            at(2, Some("Dallas"), Some("Texas")),
            at(3, Some("austin"), Some("texas")),
            at(4, Some("Fresno"), Some("California")),
            at(5, None, Some("Texas")),
            at(6, Some("Nowhere"), None),
            at(7, Some("El Paso"), Some("Texas")),
            at(8, Some("El Paso"), Some("Texas")),
            at(9, Some("El Paso"), Some("Texas")),
        ]
    }

    #[test]
    fn states_sorted_by_name() {
        let states = group_states(&sample());
        let names: Vec<&str> = states.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["California", "Texas"]);
    }

    #[test]
    fn state_groups_merge_by_slug() {
        let states = group_states(&sample());
        let texas = states.iter().find(|s| s.slug == "texas").expect("texas");
        assert_eq!(texas.name, "Texas");
        assert_eq!(texas.plumber_count, 7);
    }

    #[test]
    fn cities_keep_first_seen_order_and_counts() {
        let states = group_states(&sample());
        let texas = states.iter().find(|s| s.slug == "texas").expect("texas");
        let cities: Vec<(&str, usize)> = texas
            .cities
            .iter()
            .map(|c| (c.slug.as_str(), c.plumber_count))
            .collect();
        assert_eq!(cities, vec![("austin", 2), ("dallas", 1), ("el-paso", 3)]);

        let austin = texas.city("austin").expect("austin");
        assert_eq!(austin.name, "Austin");
        assert_eq!(austin.state, "Texas");
        assert_eq!(austin.state_slug, "texas");
    }

    #[test]
    fn cities_by_count_orders_largest_first() {
        let states = group_states(&sample());
        let texas = states.iter().find(|s| s.slug == "texas").expect("texas");
        let ordered: Vec<&str> = cities_by_count(texas)
            .into_iter()
            .map(|c| c.slug.as_str())
            .collect();
        assert_eq!(ordered, vec!["el-paso", "austin", "dallas"]);
    }

    #[test]
    fn state_names_ignore_case_when_sorting() {
        let data = vec![
            at(1, None, Some("ohio")),
            at(2, None, Some("Alaska")),
            at(3, None, Some("Nevada")),
        ];
        let names: Vec<String> = group_states(&data).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Alaska", "Nevada", "ohio"]);
    }

    #[test]
    fn unsluggable_names_are_skipped() {
        let data = vec![at(1, Some("???"), Some("!!!")), at(2, Some("???"), Some("Utah"))];
        let states = group_states(&data);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].plumber_count, 1);
        assert!(states[0].cities.is_empty());
    }

    #[test]
    fn stats() {
        let data = sample();
        let states = group_states(&data);
        let stats = DirectoryStats::compute(&data, &states);
        assert_eq!(stats.plumber_count, 9);
        assert_eq!(stats.state_count, 2);
        assert_eq!(stats.city_count, 4);
        assert_eq!(stats.without_location, 0);
    }
}
