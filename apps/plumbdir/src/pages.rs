//! # Page Metadata
//!
//! Titles, descriptions and breadcrumb trails for the three kinds of
//! directory page (state, city, listing). Shared by the HTTP API and the
//! `meta` / `jsonld` CLI commands.

use plumbdir_core::seo::{Breadcrumb, MetaTags, SeoProps, Site, generate_meta_tags};
use plumbdir_core::{CityData, Plumber, StateData, slugify};

/// Meta tags of a state page.
#[must_use]
pub fn state_meta(site: &Site, state: &StateData) -> MetaTags {
    let props = SeoProps::new(format!("Plumbers in {}", state.name))
        .description(format!(
            "Find {} trusted plumbers across {} cities in {}.",
            state.plumber_count,
            state.cities.len(),
            state.name
        ))
        .canonical(format!("/state/{}", state.slug));
    generate_meta_tags(site, &props)
}

/// Meta tags of a city page.
#[must_use]
pub fn city_meta(site: &Site, city: &CityData) -> MetaTags {
    let props = SeoProps::new(format!("Plumbers in {}, {}", city.name, city.state))
        .description(format!(
            "Compare {} local plumbers in {}, {}: ratings, reviews, hours and contact details.",
            city.plumber_count, city.name, city.state
        ))
        .canonical(format!("/state/{}/{}", city.state_slug, city.slug));
    generate_meta_tags(site, &props)
}

/// Meta tags of a listing page. The listing's own description and image
/// replace the site defaults when present.
#[must_use]
pub fn plumber_meta(site: &Site, plumber: &Plumber) -> MetaTags {
    let location = [plumber.city_name(), plumber.state_name()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    let title = if location.is_empty() {
        plumber.title.clone()
    } else {
        format!("{} - Plumber in {}", plumber.title, location)
    };

    let mut props = SeoProps::new(title).canonical(format!("/plumber/{}", plumber.slug));
    if let Some(description) = plumber.description_text() {
        props = props.description(description);
    }
    if !plumber.image_url().is_empty() {
        props = props.og_image(plumber.image_url());
    }
    generate_meta_tags(site, &props)
}

/// Home → state → city → listing, skipping levels the record lacks.
#[must_use]
pub fn plumber_breadcrumbs(plumber: &Plumber) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb::new("Home", "/")];
    if let Some(state) = plumber.state_name() {
        let state_slug = slugify(state);
        crumbs.push(Breadcrumb::new(state, format!("/state/{}", state_slug)));
        if let Some(city) = plumber.city_name() {
            crumbs.push(Breadcrumb::new(
                city,
                format!("/state/{}/{}", state_slug, slugify(city)),
            ));
        }
    }
    crumbs.push(Breadcrumb::new(
        plumber.title.as_str(),
        format!("/plumber/{}", plumber.slug),
    ));
    crumbs
}

/// Home → state.
#[must_use]
pub fn state_breadcrumbs(state: &StateData) -> Vec<Breadcrumb> {
    vec![
        Breadcrumb::new("Home", "/"),
        Breadcrumb::new(state.name.as_str(), format!("/state/{}", state.slug)),
    ]
}

/// Home → state → city.
#[must_use]
pub fn city_breadcrumbs(city: &CityData) -> Vec<Breadcrumb> {
    vec![
        Breadcrumb::new("Home", "/"),
        Breadcrumb::new(city.state.as_str(), format!("/state/{}", city.state_slug)),
        Breadcrumb::new(
            city.name.as_str(),
            format!("/state/{}/{}", city.state_slug, city.slug),
        ),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> CityData {
        CityData {
            name: "Austin".to_string(),
            slug: "austin".to_string(),
            state: "Texas".to_string(),
            state_slug: "texas".to_string(),
            plumber_count: 12,
        }
    }

    #[test]
    fn breadcrumbs_follow_location() {
        let mut p = Plumber::new(1, "ace", "Ace");
        p.state = Some("New York".to_string());
        p.city = Some("Buffalo".to_string());
        let urls: Vec<String> = plumber_breadcrumbs(&p).into_iter().map(|b| b.url).collect();
        assert_eq!(
            urls,
            vec!["/", "/state/new-york", "/state/new-york/buffalo", "/plumber/ace"]
        );

        let bare = Plumber::new(2, "bare", "Bare");
        assert_eq!(plumber_breadcrumbs(&bare).len(), 2);
    }

    #[test]
    fn plumber_meta_uses_listing_fields() {
        let mut p = Plumber::new(1, "ace", "Ace");
        p.city = Some("Austin".to_string());
        p.state = Some("Texas".to_string());
        p.thumbnail = Some("https://img.example.com/a.jpg".to_string());
        let tags = plumber_meta(&Site::default(), &p);
        assert_eq!(tags.get("og:title"), Some("Ace - Plumber in Austin, Texas"));
        assert_eq!(tags.get("og:image"), Some("https://img.example.com/a.jpg"));
        assert_eq!(
            tags.get("canonical"),
            Some("https://plumbernearme.shop/plumber/ace")
        );
    }

    #[test]
    fn city_page_metadata() {
        let tags = city_meta(&Site::default(), &city());
        assert_eq!(tags.get("title"), Some("Plumbers in Austin, Texas | Plumber Near Me"));
        assert_eq!(
            tags.get("canonical"),
            Some("https://plumbernearme.shop/state/texas/austin")
        );
        let urls: Vec<String> = city_breadcrumbs(&city()).into_iter().map(|b| b.url).collect();
        assert_eq!(urls, vec!["/", "/state/texas", "/state/texas/austin"]);
    }

    #[test]
    fn state_page_metadata() {
        let state = StateData {
            name: "Texas".to_string(),
            slug: "texas".to_string(),
            plumber_count: 12,
            cities: vec![city()],
        };
        let tags = state_meta(&Site::default(), &state);
        assert_eq!(
            tags.get("description"),
            Some("Find 12 trusted plumbers across 1 cities in Texas.")
        );
        assert_eq!(state_breadcrumbs(&state).len(), 2);
    }
}
