//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::PageTarget;
use crate::api::{self, AppState, PlumberListResponse, PlumberSummary};
use crate::config::Config;
use crate::pages::{
    city_breadcrumbs, city_meta, plumber_breadcrumbs, plumber_meta, state_breadcrumbs, state_meta,
};
use chrono::NaiveDateTime;
use plumbdir_core::hours::{WEEK, day_name};
use plumbdir_core::seo::{
    self, MetaTags, Site, breadcrumb_json_ld, local_business_list_json_ld, plumber_json_ld,
};
use plumbdir_core::{
    DataSource, Dataset, DatasetLoader, DirectoryError, Plumber, Selection, cities_by_count,
    format_address, format_categories, format_hours, is_open_at_time, is_open_now, paginate,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Accepted `--at` format for `hours`.
const AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Validate output path.
///
/// The parent directory must exist; `..` and symlinks in it are resolved.
fn validate_output_path(path: &Path) -> Result<PathBuf, DirectoryError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        DirectoryError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(DirectoryError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| DirectoryError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Write `body` to `output`, or to stdout when no file is given.
pub fn write_output(output: Option<&Path>, body: &str) -> Result<(), DirectoryError> {
    let Some(output) = output else {
        println!("{}", body);
        return Ok(());
    };

    let validated = validate_output_path(output)?;
    std::fs::write(&validated, body)
        .map_err(|e| DirectoryError::IoError(format!("Write file: {}", e)))?;
    eprintln!("Wrote {} bytes to {}", body.len(), validated.display());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DirectoryError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| DirectoryError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Load the configured dataset, falling back to the sample asset.
pub fn load_dataset(config: &Config) -> (Arc<Dataset>, DataSource) {
    let loader = DatasetLoader::new(config.data.primary.clone(), config.data.fallback.clone());
    (loader.load(), loader.source())
}

fn find_plumber<'a>(dataset: &'a Dataset, slug: &str) -> Result<&'a Plumber, DirectoryError> {
    dataset
        .plumber_by_slug(slug)
        .ok_or_else(|| DirectoryError::NotFound(format!("plumber '{}'", slug)))
}

fn open_label(open: Option<bool>) -> &'static str {
    match open {
        Some(true) => "open",
        Some(false) => "closed",
        None => "no hours",
    }
}

fn print_listings(plumbers: &[&Plumber]) {
    for p in plumbers {
        let rating = p
            .rating_value()
            .map(|r| format!("{:.1} ({} reviews)", r, p.review_count_or_zero()))
            .unwrap_or_else(|| "unrated".to_string());
        println!("  {:<40} {:<32} {}", p.slug, format_address(p), rating);
    }
}

fn print_list(json_mode: bool, title: &str, plumbers: &[&Plumber]) -> Result<(), DirectoryError> {
    if json_mode {
        return print_json(&PlumberListResponse::all(plumbers));
    }
    println!("{} ({})", title, plumbers.len());
    println!("{}", "=".repeat(title.len()));
    print_listings(plumbers);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), DirectoryError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let (dataset, source) = load_dataset(&config);
    let addr = config.bind_addr();

    println!("plumbdir Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", addr);
    println!("  Site:     {}", config.site_url().unwrap_or("(unset)"));
    println!("  Dataset:  {} ({} listings)", source, dataset.len());
    println!("  Rate:     {} req/s", config.server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET /health                          - Health check");
    println!("  GET /status                          - Dataset status");
    println!("  GET /sitemap.xml, /robots.txt        - Crawler files");
    println!("  GET /api/states[/{{state}}[/{{city}}]]   - Location pages");
    println!("  GET /api/plumbers/{{slug}}             - One listing");
    println!("  GET /api/search, /api/top-rated      - Selections");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(dataset, config)?.with_source(source);
    api::run_server(&addr, state).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show dataset status.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), DirectoryError> {
    let (dataset, source) = load_dataset(config);
    let stats = dataset.stats();

    if json_mode {
        let output = serde_json::json!({
            "source": source.to_string(),
            "site_url": config.site_url(),
            "plumber_count": stats.plumber_count,
            "state_count": stats.state_count,
            "city_count": stats.city_count,
            "without_location": stats.without_location,
        });
        return print_json(&output);
    }

    println!("plumbdir Status");
    println!("===============");
    println!("Dataset:  {}", source);
    println!("Site:     {}", config.site_url().unwrap_or("(unset)"));
    println!();
    println!("Listings:         {}", stats.plumber_count);
    println!("States:           {}", stats.state_count);
    println!("Cities:           {}", stats.city_count);
    println!("Without location: {}", stats.without_location);

    Ok(())
}

// =============================================================================
// LOCATION COMMANDS
// =============================================================================

/// List states.
pub fn cmd_states(config: &Config, json_mode: bool) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);

    if json_mode {
        return print_json(&dataset.states());
    }

    println!("States ({})", dataset.states().len());
    println!("======");
    for state in dataset.states() {
        println!(
            "  {:<24} {:>5} listings  {:>4} cities  /state/{}",
            state.name,
            state.plumber_count,
            state.cities.len(),
            state.slug
        );
    }
    Ok(())
}

/// List the cities of one state, largest first.
pub fn cmd_cities(config: &Config, json_mode: bool, state_slug: &str) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    let state = dataset
        .state_by_slug(state_slug)
        .ok_or_else(|| DirectoryError::NotFound(format!("state '{}'", state_slug)))?;
    let cities = cities_by_count(state);

    if json_mode {
        return print_json(&cities);
    }

    println!("Cities in {} ({})", state.name, cities.len());
    for city in cities {
        println!(
            "  {:<28} {:>5} listings  /state/{}/{}",
            city.name, city.plumber_count, city.state_slug, city.slug
        );
    }
    Ok(())
}

// =============================================================================
// LISTING COMMANDS
// =============================================================================

/// List listings, optionally within a state or city.
pub fn cmd_plumbers(
    config: &Config,
    json_mode: bool,
    state: Option<&str>,
    city: Option<&str>,
    page: usize,
    per_page: usize,
) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    let selection = match (state, city) {
        (Some(state), Some(city)) => Selection::city(state, city),
        (Some(state), None) => Selection::state(state),
        _ => Selection::All,
    };
    let selected = dataset.select(&selection);
    let page = paginate(&selected, page, per_page);

    if json_mode {
        return print_json(&PlumberListResponse::from_page(page));
    }

    println!(
        "Listings: page {} of {} ({} total)",
        page.current_page, page.total_pages, page.total_items
    );
    print_listings(&page.items);
    Ok(())
}

/// Show one listing.
pub fn cmd_show(config: &Config, json_mode: bool, slug: &str) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    let plumber = find_plumber(&dataset, slug)?;

    if json_mode {
        return print_json(&PlumberSummary::from(plumber));
    }

    println!("{}", plumber.title);
    println!("{}", "=".repeat(plumber.title.chars().count()));
    println!("Address:    {}", format_address(plumber));
    println!("Categories: {}", format_categories(plumber));
    if let Some(phone) = plumber.phone_text() {
        println!("Phone:      {}", phone);
    }
    if let Some(website) = plumber.website_url() {
        println!("Website:    {}", website);
    }
    if let Some(rating) = plumber.rating_value() {
        println!(
            "Rating:     {:.1} ({} reviews)",
            rating,
            plumber.review_count_or_zero()
        );
    }
    println!("Now:        {}", open_label(is_open_now(plumber)));
    if let Some(description) = plumber.description_text() {
        println!();
        println!("{}", description);
    }
    Ok(())
}

/// Show a listing's week and whether it is open at a given time.
pub fn cmd_hours(
    config: &Config,
    json_mode: bool,
    slug: &str,
    at: Option<&str>,
) -> Result<(), DirectoryError> {
    let at = match at {
        Some(text) => NaiveDateTime::parse_from_str(text, AT_FORMAT).map_err(|e| {
            DirectoryError::InvalidArgument(format!("--at '{}': {} (expected {})", text, e, AT_FORMAT))
        })?,
        None => chrono::Local::now().naive_local(),
    };

    let (dataset, _) = load_dataset(config);
    let plumber = find_plumber(&dataset, slug)?;
    let hours = format_hours(plumber);
    let open = is_open_at_time(plumber, at);

    if json_mode {
        let output = serde_json::json!({
            "slug": plumber.slug,
            "at": at.format(AT_FORMAT).to_string(),
            "open": open,
            "hours": hours,
        });
        return print_json(&output);
    }

    println!("{} at {}: {}", plumber.title, at.format(AT_FORMAT), open_label(open));
    for day in WEEK {
        let name = day_name(day);
        let entries = hours.get(name).map_or("-", String::as_str);
        println!("  {:<10} {}", name, entries);
    }
    Ok(())
}

/// Search listing titles.
pub fn cmd_search(config: &Config, json_mode: bool, query: &str) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    let results = dataset.search(query.trim());
    print_list(json_mode, &format!("Results for '{}'", query), &results)
}

/// Best-rated listings.
pub fn cmd_top_rated(config: &Config, json_mode: bool, limit: usize) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    print_list(json_mode, "Top rated", &dataset.top_rated(limit))
}

/// Most-reviewed listings.
pub fn cmd_most_reviewed(
    config: &Config,
    json_mode: bool,
    limit: usize,
) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    print_list(json_mode, "Most reviewed", &dataset.most_reviewed(limit))
}

/// Listings that no state or city page shows.
pub fn cmd_unlisted(config: &Config, json_mode: bool) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    print_list(
        json_mode,
        "Missing state or city",
        &dataset.plumbers_missing_city_or_state(),
    )
}

// =============================================================================
// SEO COMMANDS
// =============================================================================

/// Write `sitemap.xml`, dated today.
pub fn cmd_sitemap(config: &Config, output: Option<&Path>) -> Result<(), DirectoryError> {
    let (dataset, _) = load_dataset(config);
    let today = chrono::Local::now().date_naive();
    let xml = seo::build_sitemap(
        config.site_url(),
        &dataset,
        today,
        config.sitemap.static_pages.as_slice(),
    )?;
    write_output(output, &xml)
}

/// Write `robots.txt`.
pub fn cmd_robots(config: &Config, output: Option<&Path>) -> Result<(), DirectoryError> {
    let robots = seo::build_robots_txt(config.site_url())?;
    write_output(output, &robots)
}

/// Print the JSON-LD of a page.
pub fn cmd_jsonld(
    config: &Config,
    target: &PageTarget,
    breadcrumbs: bool,
) -> Result<(), DirectoryError> {
    let site = config.site()?;
    let (dataset, _) = load_dataset(config);
    let value = page_json_ld(&site, &dataset, target, breadcrumbs)?;
    print_json(&value)
}

/// Print the meta tags of a page.
pub fn cmd_meta(config: &Config, target: &PageTarget, html: bool) -> Result<(), DirectoryError> {
    let site = config.site()?;
    let (dataset, _) = load_dataset(config);
    let tags = page_meta(&site, &dataset, target)?;
    if html {
        println!("{}", tags.to_html());
        Ok(())
    } else {
        print_json(&tags)
    }
}

/// JSON-LD for a page: the listing's `LocalBusiness` or the location's
/// `ItemList`, or the page's `BreadcrumbList`.
pub fn page_json_ld(
    site: &Site,
    dataset: &Dataset,
    target: &PageTarget,
    breadcrumbs: bool,
) -> Result<serde_json::Value, DirectoryError> {
    match target {
        PageTarget::Plumber { slug } => {
            let plumber = find_plumber(dataset, slug)?;
            Ok(if breadcrumbs {
                breadcrumb_json_ld(site, &plumber_breadcrumbs(plumber))
            } else {
                plumber_json_ld(site, plumber)
            })
        }
        PageTarget::State { state } => {
            let data = dataset
                .state_by_slug(state)
                .ok_or_else(|| DirectoryError::NotFound(format!("state '{}'", state)))?;
            Ok(if breadcrumbs {
                breadcrumb_json_ld(site, &state_breadcrumbs(data))
            } else {
                let plumbers = dataset.plumbers_in_state(state);
                local_business_list_json_ld(site, plumbers, &data.name)
            })
        }
        PageTarget::City { state, city } => {
            let data = dataset
                .city_by_slug(state, city)
                .ok_or_else(|| DirectoryError::NotFound(format!("city '{}/{}'", state, city)))?;
            Ok(if breadcrumbs {
                breadcrumb_json_ld(site, &city_breadcrumbs(data))
            } else {
                let plumbers = dataset.plumbers_in_city(state, city);
                let location = format!("{}, {}", data.name, data.state);
                local_business_list_json_ld(site, plumbers, &location)
            })
        }
    }
}

/// Meta tags for a page.
pub fn page_meta(
    site: &Site,
    dataset: &Dataset,
    target: &PageTarget,
) -> Result<MetaTags, DirectoryError> {
    match target {
        PageTarget::Plumber { slug } => Ok(plumber_meta(site, find_plumber(dataset, slug)?)),
        PageTarget::State { state } => dataset
            .state_by_slug(state)
            .map(|data| state_meta(site, data))
            .ok_or_else(|| DirectoryError::NotFound(format!("state '{}'", state))),
        PageTarget::City { state, city } => dataset
            .city_by_slug(state, city)
            .map(|data| city_meta(site, data))
            .ok_or_else(|| DirectoryError::NotFound(format!("city '{}/{}'", state, city))),
    }
}

// =============================================================================
// TESTS
// =============================================================================
