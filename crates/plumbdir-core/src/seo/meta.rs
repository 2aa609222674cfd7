//! Page meta tags: title, description, Open Graph, Twitter and article tags.

use super::{Site, escape_xml};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Open Graph page type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageType {
    #[default]
    Website,
    Article,
}

impl PageType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article metadata, only emitted for [`PageType::Article`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleMeta {
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
}

/// Inputs for [`generate_meta_tags`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeoProps {
    pub title: String,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
    pub og_image: Option<String>,
    pub page_type: PageType,
    pub article: Option<ArticleMeta>,
    pub no_index: bool,
}

impl SeoProps {
    /// Props for a plain website page.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn canonical(mut self, url: impl Into<String>) -> Self {
        self.canonical_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn og_image(mut self, image: impl Into<String>) -> Self {
        self.og_image = Some(image.into());
        self
    }

    #[must_use]
    pub fn article(mut self, article: ArticleMeta) -> Self {
        self.page_type = PageType::Article;
        self.article = Some(article);
        self
    }

    #[must_use]
    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }
}

/// Ordered tag name → content pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaTags(Vec<(String, String)>);

impl MetaTags {
    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Content of a tag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `<head>` markup, one element per line.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.iter()
            .map(|(key, value)| {
                let value = escape_xml(value);
                if key == "title" {
                    format!("<title>{value}</title>")
                } else if key == "canonical" {
                    format!("<link rel=\"canonical\" href=\"{value}\">")
                } else if key.starts_with("og:") || key.starts_with("article:") {
                    let property = if key.starts_with("article:tag:") {
                        "article:tag"
                    } else {
                        key
                    };
                    format!("<meta property=\"{property}\" content=\"{value}\">")
                } else {
                    format!("<meta name=\"{key}\" content=\"{value}\">")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for MetaTags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build the meta tags of a page.
#[must_use]
pub fn generate_meta_tags(site: &Site, props: &SeoProps) -> MetaTags {
    let description = props
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(site.default_description());
    let image = site.absolute(
        props
            .og_image
            .as_deref()
            .filter(|i| !i.is_empty())
            .unwrap_or(site.default_og_image()),
    );

    let mut tags = MetaTags::default();
    tags.insert("title", format!("{} | {}", props.title, site.name()));
    tags.insert("description", description);

    tags.insert("og:title", props.title.as_str());
    tags.insert("og:description", description);
    tags.insert("og:type", props.page_type.as_str());
    tags.insert("og:site_name", site.name());
    tags.insert("og:image", image.as_str());

    tags.insert("twitter:card", "summary_large_image");
    tags.insert("twitter:title", props.title.as_str());
    tags.insert("twitter:description", description);
    tags.insert("twitter:image", image);

    if let Some(canonical) = props.canonical_url.as_deref().filter(|c| !c.is_empty()) {
        tags.insert("canonical", site.absolute(canonical));
    }

    if let (PageType::Article, Some(article)) = (props.page_type, &props.article) {
        if let Some(published) = &article.published_time {
            tags.insert("article:published_time", published.as_str());
        }
        if let Some(modified) = &article.modified_time {
            tags.insert("article:modified_time", modified.as_str());
        }
        if let Some(author) = &article.author {
            tags.insert("article:author", author.as_str());
        }
        for (i, tag) in article.tags.iter().enumerate() {
            tags.insert(format!("article:tag:{i}"), tag.as_str());
        }
    }

    if props.no_index {
        tags.insert("robots", "noindex, nofollow");
    }

    tags
}
