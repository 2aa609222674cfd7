//! # plumbdir CLI Module
//!
//! This module implements the CLI interface for plumbdir.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show dataset counts and origin
//! - `states` / `cities` - Browse the location index
//! - `plumbers` - List listings, optionally by state and city
//! - `show` / `hours` - One listing, or its weekly hours
//! - `search` / `top-rated` / `most-reviewed` / `unlisted` - Selections
//! - `sitemap` / `robots` - Crawler files
//! - `jsonld` / `meta` - Structured data and meta tags for a page

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use plumbdir_core::DirectoryError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// plumbdir - Plumber Directory
///
/// Serve and inspect a read-only directory of plumbing businesses.
#[derive(Parser, Debug)]
#[command(name = "plumbdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to plumbdir.toml (default: ./plumbdir.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset file, overriding `data.primary`
    #[arg(short = 'D', long, global = true)]
    pub data: Option<PathBuf>,

    /// Public site URL, overriding `site.url`
    #[arg(long, global = true)]
    pub site_url: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The banner is only printed ahead of the long-running server.
    #[must_use]
    pub fn shows_banner(&self) -> bool {
        !self.quiet && !self.json_mode && matches!(self.command, Some(Commands::Server { .. }))
    }

    /// Resolve configuration: file, then environment, then flags.
    pub fn resolve_config(&self) -> Result<Config, DirectoryError> {
        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env();
        if let Some(data) = &self.data {
            config.data.primary = data.clone();
        }
        if let Some(url) = &self.site_url {
            config.site.url = url.clone();
        }
        Ok(config)
    }
}

/// A directory page, for the per-page SEO commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    /// A listing page
    Plumber {
        /// Listing slug
        slug: String,
    },
    /// A state page
    State {
        /// State slug (e.g. "new-york")
        state: String,
    },
    /// A city page
    City {
        /// State slug
        state: String,
        /// City slug
        city: String,
    },
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (default: server.host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show dataset status
    Status,

    /// List states with their listing counts
    States,

    /// List the cities of a state, largest first
    Cities {
        /// State slug
        state: String,
    },

    /// List listings, paginated
    Plumbers {
        /// Restrict to a state slug
        #[arg(short, long)]
        state: Option<String>,

        /// Restrict to a city slug (requires --state)
        #[arg(short = 'C', long, requires = "state")]
        city: Option<String>,

        /// Page number, 1-based
        #[arg(long, default_value = "1")]
        page: usize,

        /// Listings per page
        #[arg(long, default_value = "20")]
        per_page: usize,
    },

    /// Show one listing
    Show {
        /// Listing slug
        slug: String,
    },

    /// Show a listing's weekly hours and whether it is open
    Hours {
        /// Listing slug
        slug: String,

        /// Evaluate at this local time (YYYY-MM-DDTHH:MM) instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Search listings by title
    Search {
        /// Case-insensitive title fragment
        query: String,
    },

    /// Best-rated listings
    TopRated {
        /// Number of listings
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Most-reviewed listings
    MostReviewed {
        /// Number of listings
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Listings missing a state or city
    Unlisted,

    /// Write sitemap.xml
    Sitemap {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write robots.txt
    Robots {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print schema.org JSON-LD for a page
    Jsonld {
        /// Emit the page's BreadcrumbList instead of its main payload
        #[arg(short, long)]
        breadcrumbs: bool,

        #[command(subcommand)]
        target: PageTarget,
    },

    /// Print the meta tags of a page
    Meta {
        /// Render as HTML `<meta>` / `<link>` elements
        #[arg(long)]
        html: bool,

        #[command(subcommand)]
        target: PageTarget,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DirectoryError> {
    let config = cli.resolve_config()?;
    if cli.verbose {
        tracing::info!(?config, "resolved configuration");
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config, host, port).await,
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::States) => cmd_states(&config, json_mode),
        Some(Commands::Cities { state }) => cmd_cities(&config, json_mode, &state),
        Some(Commands::Plumbers {
            state,
            city,
            page,
            per_page,
        }) => cmd_plumbers(
            &config,
            json_mode,
            state.as_deref(),
            city.as_deref(),
            page,
            per_page,
        ),
        Some(Commands::Show { slug }) => cmd_show(&config, json_mode, &slug),
        Some(Commands::Hours { slug, at }) => cmd_hours(&config, json_mode, &slug, at.as_deref()),
        Some(Commands::Search { query }) => cmd_search(&config, json_mode, &query),
        Some(Commands::TopRated { limit }) => cmd_top_rated(&config, json_mode, limit),
        Some(Commands::MostReviewed { limit }) => cmd_most_reviewed(&config, json_mode, limit),
        Some(Commands::Unlisted) => cmd_unlisted(&config, json_mode),
        Some(Commands::Sitemap { output }) => cmd_sitemap(&config, output.as_deref()),
        Some(Commands::Robots { output }) => cmd_robots(&config, output.as_deref()),
        Some(Commands::Jsonld {
            breadcrumbs,
            target,
        }) => cmd_jsonld(&config, &target, breadcrumbs),
        Some(Commands::Meta { html, target }) => cmd_meta(&config, &target, html),
        None => {
            // No subcommand - show status by default
            cmd_status(&config, json_mode)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
