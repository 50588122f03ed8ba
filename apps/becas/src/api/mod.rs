//! # Becas HTTP API Module
//!
//! This module implements the HTTP JSON API using axum.
//!
//! ## Public Viewer
//!
//! - `GET /convocatorias` - Active editions
//! - `GET /convocatorias/{editionId}/etapas` - Active stages
//! - `GET /convocatorias/{editionId}/etapas/{stageId}/secciones` - Active sections
//! - `GET /convocatorias/{editionId}/etapas/{stageId}/secciones/{sectionId}` - Section content
//! - Any other path - Default view with `404`
//!
//! ## Admin Console
//!
//! - `GET|POST /admin/convocatorias`, `GET|PATCH|DELETE /admin/convocatorias/{editionId}`
//! - `GET|POST .../{editionId}/etapas`, `GET|PATCH|DELETE .../etapas/{stageId}`, `POST .../move`
//! - `GET|POST .../etapas/{stageId}/secciones`, `POST .../secciones/presets`
//! - `GET|PATCH|DELETE .../secciones/{sectionId}`, `POST .../move`
//! - `GET|POST .../secciones/{sectionId}/contenido`, `GET|PATCH|DELETE .../contenido/{itemId}`,
//!   `POST .../move`
//! - `GET /admin/export/convocatorias.csv`, `POST /admin/import/convocatorias` (501)
//! - `GET /admin/presets`
//!
//! ## Operational
//!
//! - `GET /health` - Health check
//! - `GET /status` - Record counts

mod handlers;
mod middleware;
mod types;
mod viewer;

pub use middleware::{GlobalRateLimiter, create_rate_limiter, rate_limit_middleware};
pub use types::{
    ApiError, ApiResponse, CategoryOptions, ErrorResponse, HealthResponse, MoveRequest,
    PresetsResponse, StatusResponse, ViewerFallbackResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use becas_core::{Catalog, CatalogError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The catalog. Readers share the lock; writers hold it exclusively.
    pub catalog: Arc<RwLock<Catalog>>,
    /// Server settings used when building the router.
    pub server: Arc<ServerConfig>,
}

impl AppState {
    /// Create state with default server settings.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_config(catalog, ServerConfig::default())
    }

    #[must_use]
    pub fn with_config(catalog: Catalog, server: ServerConfig) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            server: Arc::new(server),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins
/// - empty: localhost only
/// - otherwise: the listed origins
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| match s.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", s);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        build_localhost_cors()
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods(CORS_METHODS)
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

fn admin_routes() -> Router<AppState> {
    const EDITION: &str = "/convocatorias/{editionId}";
    const STAGE: &str = "/convocatorias/{editionId}/etapas/{stageId}";
    const SECTION: &str = "/convocatorias/{editionId}/etapas/{stageId}/secciones/{sectionId}";
    const ITEM: &str =
        "/convocatorias/{editionId}/etapas/{stageId}/secciones/{sectionId}/contenido/{itemId}";

    Router::new()
        .route(
            "/convocatorias",
            get(handlers::list_editions_handler).post(handlers::create_edition_handler),
        )
        .route(
            EDITION,
            get(handlers::get_edition_handler)
                .patch(handlers::update_edition_handler)
                .delete(handlers::delete_edition_handler),
        )
        .route(
            &format!("{EDITION}/etapas"),
            get(handlers::list_stages_handler).post(handlers::create_stage_handler),
        )
        .route(
            STAGE,
            get(handlers::get_stage_handler)
                .patch(handlers::update_stage_handler)
                .delete(handlers::delete_stage_handler),
        )
        .route(&format!("{STAGE}/move"), post(handlers::move_stage_handler))
        .route(
            &format!("{STAGE}/secciones"),
            get(handlers::list_sections_handler).post(handlers::create_section_handler),
        )
        .route(
            &format!("{STAGE}/secciones/presets"),
            post(handlers::seed_sections_handler),
        )
        .route(
            SECTION,
            get(handlers::get_section_handler)
                .patch(handlers::update_section_handler)
                .delete(handlers::delete_section_handler),
        )
        .route(
            &format!("{SECTION}/move"),
            post(handlers::move_section_handler),
        )
        .route(
            &format!("{SECTION}/contenido"),
            get(handlers::list_items_handler).post(handlers::create_item_handler),
        )
        .route(
            ITEM,
            get(handlers::get_item_handler)
                .patch(handlers::update_item_handler)
                .delete(handlers::delete_item_handler),
        )
        .route(&format!("{ITEM}/move"), post(handlers::move_item_handler))
        .route(
            "/export/convocatorias.csv",
            get(handlers::export_csv_handler),
        )
        .route("/import/convocatorias", post(handlers::import_handler))
        .route("/presets", get(handlers::presets_handler))
}

fn viewer_routes() -> Router<AppState> {
    Router::new()
        .route("/convocatorias", get(viewer::editions_handler))
        .route(
            "/convocatorias/{editionId}/etapas",
            get(viewer::stages_handler),
        )
        .route(
            "/convocatorias/{editionId}/etapas/{stageId}/secciones",
            get(viewer::sections_handler),
        )
        .route(
            "/convocatorias/{editionId}/etapas/{stageId}/secciones/{sectionId}",
            get(viewer::section_handler),
        )
}

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - global quota (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.server.cors_origins);

    let rate_limit = state.server.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .nest("/admin", admin_routes())
        .merge(viewer_routes())
        .fallback(viewer::fallback_handler);

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(
    addr: &str,
    catalog: Catalog,
    server: ServerConfig,
) -> Result<(), CatalogError> {
    let state = AppState::with_config(catalog, server);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CatalogError::Storage(format!("Bind failed: {}", e)))?;

    tracing::info!("Becas HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CatalogError::Storage(format!("Server error: {}", e)))
}
