//! # plumbdir - Plumber Directory Server
//!
//! The main binary for the plumbdir directory.
//!
//! This application provides:
//! - HTTP API server (axum-based, read-only)
//! - CLI interface for lookups and SEO output
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                apps/plumbdir (THE BINARY)               │
//! │                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │  │    CLI      │    │  HTTP API   │    │   Config   │   │
//! │  │   (clap)    │    │   (axum)    │    │   (toml)   │   │
//! │  └──────┬──────┘    └──────┬──────┘    └─────┬──────┘   │
//! │         └──────────────────┼─────────────────┘          │
//! │                            ▼                            │
//! │                   ┌────────────────┐                    │
//! │                   │ plumbdir-core  │                    │
//! │                   │  (THE LOGIC)   │                    │
//! │                   └────────────────┘                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! plumbdir server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! plumbdir status
//! plumbdir plumbers --state texas --city austin
//! plumbdir sitemap -o public/sitemap.xml
//! ```

use clap::Parser;
use plumbdir::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // PLUMBDIR_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("PLUMBDIR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plumbdir=info,plumbdir_core=info,tower_http=debug".into());

    // Logs go to stderr so command output on stdout stays pipeable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if cli.shows_banner() {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the plumbdir startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┬  ┬ ┬┌┬┐┌┐ ┌┬┐┬┬─┐
  ├─┘│  │ ││││├┴┐ │││├┬┘
  ┴  ┴─┘└─┘┴ ┴└─┘─┴┘┴┴└─

  Plumber Directory v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
