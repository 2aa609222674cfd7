//! # plumbdir HTTP API Module
//!
//! This module implements the read-only HTTP API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Dataset counts and origin
//! - `GET /robots.txt` - Crawler rules
//! - `GET /sitemap.xml` - Every state, city and listing page
//! - `GET /api/states` - States with their cities
//! - `GET /api/states/{state}` - State page data
//! - `GET /api/states/{state}/{city}` - City page data
//! - `GET /api/plumbers/{slug}` - One listing
//! - `GET /api/plumbers/{slug}/structured-data` - Listing JSON-LD
//! - `GET /api/search?q=` - Title search
//! - `GET /api/top-rated?limit=` - Best-rated listings
//! - `GET /api/most-reviewed?limit=` - Most-reviewed listings
//! - `GET /api/unlisted` - Listings missing a state or city
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `PLUMBDIR_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `PLUMBDIR_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    CityPageResponse, DEFAULT_PER_PAGE, ErrorResponse, HealthResponse, LimitParams,
    MAX_PAGE_SIZE, PageParams, PlumberListResponse, PlumberResponse, PlumberSummary,
    SearchParams, StatePageResponse, StatesResponse, StatusResponse,
};

use crate::config::Config;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use plumbdir_core::seo::Site;
use plumbdir_core::{DataSource, Dataset, DirectoryError};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable listing allowed CORS origins.
pub const ENV_CORS_ORIGINS: &str = "PLUMBDIR_CORS_ORIGINS";

/// Largest accepted request body. The API is read-only.
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the loaded dataset and the site it is published as.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub site: Arc<Site>,
    pub config: Arc<Config>,
    pub source: DataSource,
}

impl AppState {
    /// Create state for a dataset published under `config`.
    pub fn new(dataset: Arc<Dataset>, config: Config) -> Result<Self, DirectoryError> {
        let site = config.site()?;
        Ok(Self {
            dataset,
            site: Arc::new(site),
            config: Arc::new(config),
            source: DataSource::Empty,
        })
    }

    /// Record where the dataset was loaded from.
    #[must_use]
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `PLUMBDIR_CORS_ORIGINS`:
/// - If "*": allows all origins
/// - If not set: defaults to localhost only
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(ENV_CORS_ORIGINS).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins ({}=*)", ENV_CORS_ORIGINS);
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in {}, defaulting to localhost only",
                    ENV_CORS_ORIGINS
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!(
                "CORS: No {} set, defaulting to localhost only",
                ENV_CORS_ORIGINS
            );
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:4321",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if `server.rate_limit` > 0)
pub fn create_router(state: AppState) -> Router {
    let rate_limit = state.config.server.rate_limit;

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/robots.txt", get(handlers::robots_handler))
        .route("/sitemap.xml", get(handlers::sitemap_handler))
        .route("/api/states", get(handlers::states_handler))
        .route("/api/states/{state}", get(handlers::state_handler))
        .route("/api/states/{state}/{city}", get(handlers::city_handler))
        .route("/api/plumbers/{slug}", get(handlers::plumber_handler))
        .route(
            "/api/plumbers/{slug}/structured-data",
            get(handlers::plumber_structured_data_handler),
        )
        .route("/api/search", get(handlers::search_handler))
        .route("/api/top-rated", get(handlers::top_rated_handler))
        .route("/api/most-reviewed", get(handlers::most_reviewed_handler))
        .route("/api/unlisted", get(handlers::unlisted_handler));

    if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), DirectoryError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DirectoryError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("plumbdir HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DirectoryError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
