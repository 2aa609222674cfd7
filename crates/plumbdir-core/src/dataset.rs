//! # Dataset Module
//!
//! The in-memory directory snapshot and its loader.
//!
//! ## Lifecycle
//!
//! - [`DatasetLoader::load`] parses the bundled JSON file on first use and
//!   hands out the same `Arc<Dataset>` afterwards.
//! - When the primary file is missing or malformed the loader falls back to
//!   the secondary asset; when that fails too it memoizes an empty dataset
//!   and logs the error.
//! - A `Dataset` is never mutated after construction. Derived views (slug
//!   index, state list, state → city names, grouped states) are computed
//!   once, on first request.

use crate::grouping::{DirectoryStats, group_states};
use crate::query::{self, Selection};
use crate::types::{CityData, DirectoryError, Plumber, StateData};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Largest dataset file the loader will read (256 MB).
pub const MAX_DATASET_FILE_SIZE: u64 = 256 * 1024 * 1024;

// =============================================================================
// DATASET
// =============================================================================

/// A read-only snapshot of directory records.
#[derive(Debug, Default)]
pub struct Dataset {
    plumbers: Vec<Plumber>,
    slug_index: OnceLock<BTreeMap<String, usize>>,
    states: OnceLock<Vec<String>>,
    states_cities: OnceLock<BTreeMap<String, Vec<String>>>,
    grouped: OnceLock<Vec<StateData>>,
}

impl Dataset {
    /// Wrap a list of records.
    #[must_use]
    pub fn new(plumbers: Vec<Plumber>) -> Self {
        Self {
            plumbers,
            ..Self::default()
        }
    }

    /// An empty dataset.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of records.
    ///
    /// The top level must be an array. Elements that are not usable records
    /// are skipped with a warning instead of failing the whole file.
    pub fn from_json_str(json: &str) -> Result<Self, DirectoryError> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(|e| DirectoryError::ParseError(e.to_string()))?;

        let mut plumbers = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Plumber>(value) {
                Ok(plumber) => plumbers.push(plumber),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable record");
                }
            }
        }
        Ok(Self::new(plumbers))
    }

    /// Read and parse a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| {
            DirectoryError::IoError(format!("Cannot stat '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_DATASET_FILE_SIZE {
            return Err(DirectoryError::FileTooLarge {
                path: path.display().to_string(),
                size: metadata.len(),
                max: MAX_DATASET_FILE_SIZE,
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            DirectoryError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&contents).map_err(|e| match e {
            DirectoryError::ParseError(msg) => {
                DirectoryError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// All records in dataset order.
    #[must_use]
    pub fn plumbers(&self) -> &[Plumber] {
        &self.plumbers
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plumbers.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plumbers.is_empty()
    }

    // -------------------------------------------------------------------------
    // Memoized views
    // -------------------------------------------------------------------------

    fn slug_index(&self) -> &BTreeMap<String, usize> {
        self.slug_index.get_or_init(|| {
            let mut index = BTreeMap::new();
            for (i, plumber) in self.plumbers.iter().enumerate() {
                if plumber.slug.is_empty() {
                    continue;
                }
                if index.contains_key(&plumber.slug) {
                    tracing::debug!(slug = %plumber.slug, "duplicate slug, keeping first record");
                    continue;
                }
                index.insert(plumber.slug.clone(), i);
            }
            tracing::debug!(entries = index.len(), "built slug index");
            index
        })
    }

    /// Record with this slug. The first record wins when slugs repeat.
    #[must_use]
    pub fn plumber_by_slug(&self, slug: &str) -> Option<&Plumber> {
        self.slug_index()
            .get(slug)
            .and_then(|&i| self.plumbers.get(i))
    }

    /// Sorted, deduplicated state names.
    #[must_use]
    pub fn state_names(&self) -> &[String] {
        self.states
            .get_or_init(|| query::unique_states(&self.plumbers))
    }

    /// State name → sorted city names.
    #[must_use]
    pub fn states_cities(&self) -> &BTreeMap<String, Vec<String>> {
        self.states_cities
            .get_or_init(|| query::unique_states_cities(&self.plumbers))
    }

    /// States with their cities and listing counts, sorted by name.
    #[must_use]
    pub fn states(&self) -> &[StateData] {
        self.grouped.get_or_init(|| {
            let grouped = group_states(&self.plumbers);
            tracing::debug!(states = grouped.len(), "grouped states");
            grouped
        })
    }

    /// A state by slug.
    #[must_use]
    pub fn state_by_slug(&self, state_slug: &str) -> Option<&StateData> {
        self.states().iter().find(|s| s.slug == state_slug)
    }

    /// Cities of a state; empty when the state is unknown.
    #[must_use]
    pub fn cities_in_state(&self, state_slug: &str) -> &[CityData] {
        self.state_by_slug(state_slug)
            .map(|s| s.cities.as_slice())
            .unwrap_or_default()
    }

    /// A city by state and city slug.
    #[must_use]
    pub fn city_by_slug(&self, state_slug: &str, city_slug: &str) -> Option<&CityData> {
        self.state_by_slug(state_slug)
            .and_then(|s| s.city(city_slug))
    }

    /// Headline numbers.
    #[must_use]
    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats::compute(&self.plumbers, self.states())
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Records whose state name matches, ignoring case.
    #[must_use]
    pub fn plumbers_for_state(&self, state: &str) -> Vec<&Plumber> {
        query::by_state(&self.plumbers, state)
    }

    /// Records whose city (and optionally state) name matches, ignoring case.
    #[must_use]
    pub fn plumbers_for_city(&self, city: &str, state: Option<&str>) -> Vec<&Plumber> {
        query::by_city(&self.plumbers, city, state)
    }

    /// Records in a state, by slug.
    #[must_use]
    pub fn plumbers_in_state(&self, state_slug: &str) -> Vec<&Plumber> {
        query::in_state(&self.plumbers, state_slug)
    }

    /// Records in a city, by slugs.
    #[must_use]
    pub fn plumbers_in_city(&self, state_slug: &str, city_slug: &str) -> Vec<&Plumber> {
        query::in_city(&self.plumbers, state_slug, city_slug)
    }

    /// Records with no city, state or address.
    #[must_use]
    pub fn plumbers_without_location(&self) -> Vec<&Plumber> {
        query::without_location(&self.plumbers)
    }

    /// Records missing a state or a city.
    #[must_use]
    pub fn plumbers_missing_city_or_state(&self) -> Vec<&Plumber> {
        query::missing_city_or_state(&self.plumbers)
    }

    /// Title search.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Plumber> {
        query::search(&self.plumbers, query)
    }

    /// Best-rated records.
    #[must_use]
    pub fn top_rated(&self, limit: usize) -> Vec<&Plumber> {
        query::top_rated(&self.plumbers, limit)
    }

    /// Most-reviewed records.
    #[must_use]
    pub fn most_reviewed(&self, limit: usize) -> Vec<&Plumber> {
        query::most_reviewed(&self.plumbers, limit)
    }

    /// Apply a selection.
    #[must_use]
    pub fn select(&self, selection: &Selection) -> Vec<&Plumber> {
        query::select(&self.plumbers, selection)
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Which asset a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The primary dataset file.
    Primary(PathBuf),
    /// The secondary (sample) asset.
    Fallback(PathBuf),
    /// Neither asset could be loaded.
    Empty,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(p) => write!(f, "primary ({})", p.display()),
            Self::Fallback(p) => write!(f, "fallback ({})", p.display()),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Loads the dataset once and shares it afterwards.
#[derive(Debug)]
pub struct DatasetLoader {
    primary: PathBuf,
    fallback: Option<PathBuf>,
    loaded: OnceLock<(Arc<Dataset>, DataSource)>,
}

impl DatasetLoader {
    /// Create a loader for a primary file with an optional fallback asset.
    #[must_use]
    pub fn new(primary: impl Into<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            fallback,
            loaded: OnceLock::new(),
        }
    }

    /// The dataset, parsed on first call.
    pub fn load(&self) -> Arc<Dataset> {
        Arc::clone(&self.loaded.get_or_init(|| self.load_uncached()).0)
    }

    /// Where the dataset came from, loading it if needed.
    pub fn source(&self) -> DataSource {
        self.loaded.get_or_init(|| self.load_uncached()).1.clone()
    }

    /// Whether the dataset has been loaded yet.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Strict load: the primary, then the fallback, else an error.
    pub fn try_load(&self) -> Result<(Dataset, DataSource), DirectoryError> {
        let primary_err = match Dataset::from_path(&self.primary) {
            Ok(dataset) => return Ok((dataset, DataSource::Primary(self.primary.clone()))),
            Err(e) => e,
        };
        tracing::warn!(
            path = %self.primary.display(),
            error = %primary_err,
            "primary dataset unavailable"
        );

        let Some(fallback) = &self.fallback else {
            return Err(DirectoryError::DatasetUnavailable {
                primary: primary_err.to_string(),
                fallback: "not configured".to_string(),
            });
        };

        match Dataset::from_path(fallback) {
            Ok(dataset) => Ok((dataset, DataSource::Fallback(fallback.clone()))),
            Err(fallback_err) => Err(DirectoryError::DatasetUnavailable {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }

    fn load_uncached(&self) -> (Arc<Dataset>, DataSource) {
        match self.try_load() {
            Ok((dataset, source)) => {
                tracing::info!(records = dataset.len(), %source, "dataset loaded");
                (Arc::new(dataset), source)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load dataset, serving empty directory");
                (Arc::new(Dataset::empty()), DataSource::Empty)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
