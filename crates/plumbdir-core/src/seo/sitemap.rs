//! `sitemap.xml` and `robots.txt` generation.

use super::escape_xml;
use crate::dataset::Dataset;
use crate::grouping::cities_by_count;
use crate::types::DirectoryError;
use chrono::NaiveDate;
use url::Url;

/// Static pages listed ahead of the generated ones. `""` is the home page.
pub const DEFAULT_STATIC_PAGES: &[&str] = &[
    "",
    "about",
    "contact",
    "privacy-policy",
    "terms-of-service",
    "plumber",
    "state",
];

/// Parse a configured site URL.
///
/// Must be an absolute http(s) URL with a host and no query or fragment.
fn parse_site_url(site_url: Option<&str>) -> Result<Url, DirectoryError> {
    let raw = site_url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(DirectoryError::MissingSiteUrl)?;
    let invalid = || DirectoryError::InvalidSiteUrl(raw.to_string());

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid());
    }
    Ok(url)
}

/// Normalize a configured site URL: required, without trailing slash.
pub fn base_url(site_url: Option<&str>) -> Result<String, DirectoryError> {
    let url = parse_site_url(site_url)?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

// =============================================================================
// ENTRIES
// =============================================================================

/// `<changefreq>` values used by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
}

impl ChangeFreq {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Kind of page an entry points at; decides priority and change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    State,
    City,
    Plumber,
    Static,
}

impl PageKind {
    /// `<priority>` as written in the XML.
    #[must_use]
    pub fn priority(&self) -> &'static str {
        match self {
            Self::Home => "1.0",
            Self::State => "0.9",
            Self::City => "0.8",
            Self::Plumber => "0.7",
            Self::Static => "0.5",
        }
    }

    #[must_use]
    pub fn change_freq(&self) -> ChangeFreq {
        match self {
            Self::Plumber => ChangeFreq::Monthly,
            _ => ChangeFreq::Weekly,
        }
    }
}

/// One `<url>` of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub kind: PageKind,
}

/// Collect sitemap entries: static pages, states, cities (largest first
/// within each state), then every listing with a slug.
#[must_use]
pub fn sitemap_entries<S: AsRef<str>>(
    base: &str,
    dataset: &Dataset,
    lastmod: NaiveDate,
    static_pages: &[S],
) -> Vec<SitemapEntry> {
    let entry = |loc: String, kind: PageKind| SitemapEntry { loc, lastmod, kind };
    let mut entries = Vec::with_capacity(static_pages.len() + dataset.len());

    for page in static_pages {
        let page = page.as_ref().trim_matches('/');
        let kind = if page.is_empty() {
            PageKind::Home
        } else {
            PageKind::Static
        };
        entries.push(entry(format!("{base}/{page}"), kind));
    }

    for state in dataset.states() {
        entries.push(entry(format!("{base}/state/{}", state.slug), PageKind::State));
    }

    for state in dataset.states() {
        for city in cities_by_count(state) {
            entries.push(entry(
                format!("{base}/state/{}/{}", state.slug, city.slug),
                PageKind::City,
            ));
        }
    }

    entries.extend(
        dataset
            .plumbers()
            .iter()
            .filter(|p| !p.slug.is_empty())
            .map(|p| entry(format!("{base}/plumber/{}", p.slug), PageKind::Plumber)),
    );

    entries
}

/// Render entries as a sitemap `urlset` document.
#[must_use]
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for e in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape_xml(&e.loc),
            e.lastmod.format("%Y-%m-%d"),
            e.kind.change_freq().as_str(),
            e.kind.priority(),
        ));
    }
    xml.push_str("</urlset>");
    xml
}

/// Build the complete `sitemap.xml`.
///
/// # Errors
///
/// [`DirectoryError::MissingSiteUrl`] when no site URL is configured.
pub fn build_sitemap<S: AsRef<str>>(
    site_url: Option<&str>,
    dataset: &Dataset,
    lastmod: NaiveDate,
    static_pages: &[S],
) -> Result<String, DirectoryError> {
    let base = base_url(site_url)?;
    let entries = sitemap_entries(&base, dataset, lastmod, static_pages);
    tracing::debug!(entries = entries.len(), "Built sitemap");
    Ok(render_sitemap(&entries))
}

// =============================================================================
// ROBOTS
// =============================================================================

/// Build `robots.txt`: allow everything and point at the sitemap.
///
/// # Errors
///
/// [`DirectoryError::MissingSiteUrl`] when no site URL is configured.
pub fn build_robots_txt(site_url: Option<&str>) -> Result<String, DirectoryError> {
    let url = parse_site_url(site_url)?;
    let host = url.host_str().unwrap_or_default();
    let base = url.as_str().trim_end_matches('/');
    Ok(format!(
        "# robots.txt file for {host}\nUser-agent: *\nAllow: /\n\n# Sitemaps\nSitemap: {base}/sitemap.xml\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Plumber;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 6).expect("date")
    }

    fn at(id: u64, slug: &str, city: &str, state: &str) -> Plumber {
        let mut p = Plumber::new(id, slug, slug.to_uppercase());
        p.city = Some(city.to_string());
        p.state = Some(state.to_string());
        p
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            at(1, "a", "Austin", "Texas"),
            at(2, "b", "Dallas", "Texas"),
            at(3, "c", "Dallas", "Texas"),
            at(4, "", "Fresno", "California"),
            at(5, "e&f", "Fresno", "California"),
        ])
    }

    #[test]
    fn base_url_requires_value_and_trims_slash() {
        assert!(matches!(base_url(None), Err(DirectoryError::MissingSiteUrl)));
        assert!(matches!(base_url(Some("  ")), Err(DirectoryError::MissingSiteUrl)));
        assert_eq!(base_url(Some("https://x.com/")).expect("url"), "https://x.com");
        assert_eq!(base_url(Some("https://x.com")).expect("url"), "https://x.com");
        assert_eq!(base_url(Some("http://x.com/blog/")).expect("url"), "http://x.com/blog");
    }

    #[test]
    fn base_url_rejects_malformed_urls() {
        for bad in [
            "https://exa mple.com",
            "https://",
            "ftp://x",
            "https://h.com?x=1",
            "https://h.com/#top",
            "example.com",
            "mailto:ops@example.com",
        ] {
            assert!(
                matches!(base_url(Some(bad)), Err(DirectoryError::InvalidSiteUrl(ref u)) if u == bad),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn entries_in_page_order() {
        let entries = sitemap_entries("https://x.com", &dataset(), date(), DEFAULT_STATIC_PAGES);
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();

        assert_eq!(locs[0], "https://x.com/");
        assert_eq!(entries[0].kind, PageKind::Home);
        assert_eq!(locs[1], "https://x.com/about");
        assert_eq!(entries[1].kind, PageKind::Static);

        let rest = &locs[DEFAULT_STATIC_PAGES.len()..];
        assert_eq!(
            rest,
            &[
                "https://x.com/state/california",
                "https://x.com/state/texas",
                "https://x.com/state/california/fresno",
                "https://x.com/state/texas/dallas",
                "https://x.com/state/texas/austin",
                "https://x.com/plumber/a",
                "https://x.com/plumber/b",
                "https://x.com/plumber/c",
                "https://x.com/plumber/e&f",
            ]
        );
    }

    #[test]
    fn page_kinds_drive_priority_and_frequency() {
        assert_eq!(PageKind::Home.priority(), "1.0");
        assert_eq!(PageKind::City.priority(), "0.8");
        assert_eq!(PageKind::Plumber.change_freq(), ChangeFreq::Monthly);
        assert_eq!(PageKind::State.change_freq(), ChangeFreq::Weekly);
    }

    #[test]
    fn rendered_xml() {
        let xml = build_sitemap(Some("https://x.com/"), &dataset(), date(), &["about"][..])
            .expect("sitemap");

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.ends_with("</urlset>"));
        assert!(xml.contains(
            "<loc>https://x.com/about</loc>\n    <lastmod>2025-04-06</lastmod>\n    <changefreq>weekly</changefreq>\n    <priority>0.5</priority>"
        ));
        assert!(xml.contains(
            "<loc>https://x.com/plumber/a</loc>\n    <lastmod>2025-04-06</lastmod>\n    <changefreq>monthly</changefreq>\n    <priority>0.7</priority>"
        ));
        assert!(xml.contains("<loc>https://x.com/plumber/e&amp;f</loc>"));
        assert_eq!(xml.matches("<url>").count(), 1 + 2 + 3 + 4);
    }

    #[test]
    fn sitemap_needs_site_url() {
        let empty: &[&str] = &[];
        assert!(matches!(
            build_sitemap(None, &Dataset::empty(), date(), empty),
            Err(DirectoryError::MissingSiteUrl)
        ));
    }

    #[test]
    fn robots() {
        let robots = build_robots_txt(Some("https://plumbernearme.shop/")).expect("robots");
        assert!(robots.starts_with("# robots.txt file for plumbernearme.shop\n"));
        assert!(robots.contains("User-agent: *\nAllow: /\n"));
        assert!(robots.ends_with("Sitemap: https://plumbernearme.shop/sitemap.xml\n"));
        assert!(matches!(build_robots_txt(None), Err(DirectoryError::MissingSiteUrl)));
    }

    #[test]
    fn robots_host_comes_from_parsed_url() {
        let robots = build_robots_txt(Some("https://Example.COM:8443/dir/")).expect("robots");
        assert!(robots.starts_with("# robots.txt file for example.com\n"));
        assert!(robots.ends_with("Sitemap: https://example.com:8443/dir/sitemap.xml\n"));
        assert!(matches!(
            build_robots_txt(Some("https://h.com?x=1")),
            Err(DirectoryError::InvalidSiteUrl(_))
        ));
    }
}
