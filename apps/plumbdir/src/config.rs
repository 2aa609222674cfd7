//! # Site Configuration
//!
//! `plumbdir.toml` plus environment overrides.
//!
//! ```toml
//! [site]
//! name = "Plumber Near Me"
//! url = "https://plumbernearme.shop"
//!
//! [data]
//! primary = "data/plumber-usa-results.json"
//! fallback = "data/plumbers-sample.json"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//!
//! [sitemap]
//! static_pages = ["", "about", "contact"]
//! ```
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! `PLUMBDIR_*` environment variables, CLI flags.

use plumbdir_core::seo::{
    DEFAULT_DESCRIPTION, DEFAULT_OG_IMAGE, DEFAULT_SITE_NAME, DEFAULT_SITE_URL,
    DEFAULT_STATIC_PAGES, Site,
};
use plumbdir_core::DirectoryError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "plumbdir.toml";

/// Full scraped dataset.
pub const DEFAULT_PRIMARY_DATA: &str = "data/plumber-usa-results.json";

/// Bundled sample used when the full dataset is missing.
pub const DEFAULT_FALLBACK_DATA: &str = "data/plumbers-sample.json";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Environment variable overriding `site.url`.
pub const ENV_SITE_URL: &str = "PLUMBDIR_SITE_URL";

/// Environment variable overriding `data.primary`.
pub const ENV_DATA: &str = "PLUMBDIR_DATA";

/// Environment variable overriding `server.rate_limit` (0 disables).
pub const ENV_RATE_LIMIT: &str = "PLUMBDIR_RATE_LIMIT";

// =============================================================================
// SECTIONS
// =============================================================================

/// `[site]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    /// Public base URL. Empty means "not configured": the sitemap and
    /// robots.txt then refuse to render.
    pub url: String,
    pub description: String,
    pub og_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            url: DEFAULT_SITE_URL.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            og_image: DEFAULT_OG_IMAGE.to_string(),
        }
    }
}

/// `[data]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub primary: PathBuf,
    pub fallback: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from(DEFAULT_PRIMARY_DATA),
            fallback: Some(PathBuf::from(DEFAULT_FALLBACK_DATA)),
        }
    }
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second across all clients; 0 disables limiting.
    pub rate_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
        }
    }
}

/// `[sitemap]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    pub static_pages: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            static_pages: DEFAULT_STATIC_PAGES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
    pub sitemap: SitemapConfig,
}

impl Config {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, DirectoryError> {
        toml::from_str(contents).map_err(|e| DirectoryError::ParseError(format!("config: {}", e)))
    }

    /// Load configuration from a file.
    ///
    /// With `path = None` the default `plumbdir.toml` is read if it exists;
    /// when it does not, defaults are used. An explicitly given path must
    /// exist. A malformed file is always an error.
    pub fn load(path: Option<&Path>) -> Result<Self, DirectoryError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(DirectoryError::IoError(format!(
                    "Config file '{}' not found",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            DirectoryError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Apply `PLUMBDIR_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the environment in production).
    ///
    /// Unparseable rate limits are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SITE_URL) {
            self.site.url = url;
        }
        if let Some(data) = lookup(ENV_DATA).filter(|d| !d.is_empty()) {
            self.data.primary = PathBuf::from(data);
        }
        if let Some(raw) = lookup(ENV_RATE_LIMIT) {
            match raw.trim().parse() {
                Ok(rps) => self.server.rate_limit = rps,
                Err(e) => tracing::warn!("{}='{}' ignored: {}", ENV_RATE_LIMIT, raw, e),
            }
        }
    }

    /// The configured site URL, `None` when unset.
    #[must_use]
    pub fn site_url(&self) -> Option<&str> {
        Some(self.site.url.trim()).filter(|u| !u.is_empty())
    }

    /// Build the validated site identity.
    ///
    /// An unset URL falls back to the public default so page URLs still
    /// resolve; the crawler files check [`Config::site_url`] themselves.
    pub fn site(&self) -> Result<Site, DirectoryError> {
        let url = self.site_url().unwrap_or(DEFAULT_SITE_URL);
        Ok(Site::new(self.site.name.as_str(), url)?
            .with_description(self.site.description.as_str())
            .with_og_image(self.site.og_image.as_str()))
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.site.name, "Plumber Near Me");
        assert_eq!(config.site_url(), Some("https://plumbernearme.shop"));
        assert_eq!(config.data.primary, PathBuf::from("data/plumber-usa-results.json"));
        assert_eq!(config.server.rate_limit, 100);
        assert_eq!(config.sitemap.static_pages.len(), 7);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [site]
            url = "https://example.com/"

            [server]
            port = 9000
            "#,
        )
        .expect("parse");

        assert_eq!(config.site.name, "Plumber Near Me");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        let site = config.site().expect("site");
        assert_eq!(site.url(), "https://example.com");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let result = Config::from_toml_str("[server]\nport = \"eighty\"");
        assert!(matches!(result, Err(DirectoryError::ParseError(_))));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load(Some(dir.path().join("absent.toml").as_path()));
        assert!(matches!(config, Err(DirectoryError::IoError(_))));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plumbdir.toml");
        std::fs::write(&path, "[data]\nprimary = \"other.json\"\n").expect("write");

        let config = Config::load(Some(&path)).expect("load");
        assert_eq!(config.data.primary, PathBuf::from("other.json"));
        assert_eq!(
            config.data.fallback,
            Some(PathBuf::from("data/plumbers-sample.json"))
        );
    }

    #[test]
    fn overrides_win_over_file() {
        let env: HashMap<&str, &str> = [
            (ENV_SITE_URL, "https://override.example"),
            (ENV_DATA, "big.json"),
            (ENV_RATE_LIMIT, "0"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.site_url(), Some("https://override.example"));
        assert_eq!(config.data.primary, PathBuf::from("big.json"));
        assert_eq!(config.server.rate_limit, 0);
    }

    #[test]
    fn bad_rate_limit_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == ENV_RATE_LIMIT).then(|| "fast".to_string()));
        assert_eq!(config.server.rate_limit, DEFAULT_RATE_LIMIT);
    }

    #[test]
    fn empty_site_url_is_unset() {
        let mut config = Config::default();
        config.site.url = "  ".to_string();
        assert_eq!(config.site_url(), None);
        assert_eq!(config.site().expect("site").url(), DEFAULT_SITE_URL);
    }

    #[test]
    fn relative_site_url_is_rejected() {
        let mut config = Config::default();
        config.site.url = "plumbernearme.shop".to_string();
        assert!(matches!(config.site(), Err(DirectoryError::InvalidSiteUrl(_))));
    }
}
