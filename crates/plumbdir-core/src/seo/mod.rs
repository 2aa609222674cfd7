//! # SEO Module
//!
//! Everything the directory emits for search engines:
//! - `meta` - title / description / Open Graph / Twitter tags
//! - `structured_data` - schema.org JSON-LD payloads
//! - `sitemap` - `sitemap.xml` and `robots.txt`
//!
//! All absolute URLs are built from a [`Site`], which is validated once so
//! the builders themselves cannot fail on a bad base URL.

mod meta;
mod sitemap;
mod structured_data;

pub use meta::{ArticleMeta, MetaTags, PageType, SeoProps, generate_meta_tags};
pub use sitemap::{
    ChangeFreq, DEFAULT_STATIC_PAGES, PageKind, SitemapEntry, base_url, build_robots_txt,
    build_sitemap, render_sitemap, sitemap_entries,
};
pub use structured_data::{
    Breadcrumb, LIST_ITEM_LIMIT, REVIEW_LIMIT, breadcrumb_json_ld, breadcrumb_structured_data,
    local_business_list_json_ld, local_business_list_structured_data, plumber_json_ld,
    plumber_structured_data,
};

use crate::types::DirectoryError;

/// Site name used when none is configured.
pub const DEFAULT_SITE_NAME: &str = "Plumber Near Me";

/// Public URL of the directory.
pub const DEFAULT_SITE_URL: &str = "https://plumbernearme.shop";

/// Description used by pages that do not provide one.
pub const DEFAULT_DESCRIPTION: &str = "Find reliable plumbers near you. Plumber Near Me is your directory for plumbing services across the USA.";

/// Social preview image used by pages that do not provide one.
pub const DEFAULT_OG_IMAGE: &str = "/images/default-og-image.jpg";

// =============================================================================
// SITE IDENTITY
// =============================================================================

/// Name, base URL and defaults of the published site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    name: String,
    url: String,
    default_description: String,
    default_og_image: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            url: DEFAULT_SITE_URL.to_string(),
            default_description: DEFAULT_DESCRIPTION.to_string(),
            default_og_image: DEFAULT_OG_IMAGE.to_string(),
        }
    }
}

impl Site {
    /// Create a site from a name and base URL.
    ///
    /// The URL must be an absolute http(s) URL with a host and no query or
    /// fragment; trailing slashes are removed.
    pub fn new(name: impl Into<String>, url: &str) -> Result<Self, DirectoryError> {
        let url = base_url(Some(url))?;
        Ok(Self {
            name: name.into(),
            url,
            ..Self::default()
        })
    }

    /// Replace the default page description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.default_description = description.into();
        self
    }

    /// Replace the default social preview image.
    #[must_use]
    pub fn with_og_image(mut self, og_image: impl Into<String>) -> Self {
        self.default_og_image = og_image.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn default_description(&self) -> &str {
        &self.default_description
    }

    #[must_use]
    pub fn default_og_image(&self) -> &str {
        &self.default_og_image
    }

    /// Make a site-relative path absolute. URLs starting with `http` pass through.
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.url, path)
        } else {
            format!("{}/{}", self.url, path)
        }
    }

    /// Listing page of a plumber.
    #[must_use]
    pub fn plumber_url(&self, slug: &str) -> String {
        format!("{}/plumber/{}", self.url, slug)
    }

    /// State page.
    #[must_use]
    pub fn state_url(&self, state_slug: &str) -> String {
        format!("{}/state/{}", self.url, state_slug)
    }

    /// City page.
    #[must_use]
    pub fn city_url(&self, state_slug: &str, city_slug: &str) -> String {
        format!("{}/state/{}/{}", self.url, state_slug, city_slug)
    }
}

/// Escape text for XML / HTML element content and attribute values.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
