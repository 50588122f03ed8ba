//! # Public Viewer Handlers
//!
//! Read-only routes for applicants. Only active records are visible; an
//! unknown or inactive target is a 404 with the standard error body, and an
//! unmatched path falls back to the default view (the active editions).

use super::{
    AppState,
    types::{ApiError, ApiResponse, ViewerFallbackResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use becas_core::{Edition, EditionId, Section, SectionPath, SectionView, Stage, StagePath};

type Reply<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub async fn editions_handler(State(state): State<AppState>) -> Reply<Vec<Edition>> {
    Ok(Json(ApiResponse::ok(
        state.catalog.read().await.viewer_editions()?,
    )))
}

pub async fn stages_handler(
    State(state): State<AppState>,
    Path(edition_id): Path<EditionId>,
) -> Reply<Vec<Stage>> {
    Ok(Json(ApiResponse::ok(
        state.catalog.read().await.viewer_stages(&edition_id)?,
    )))
}

pub async fn sections_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
) -> Reply<Vec<Section>> {
    Ok(Json(ApiResponse::ok(
        state.catalog.read().await.viewer_sections(&path)?,
    )))
}

pub async fn section_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
) -> Reply<SectionView> {
    Ok(Json(ApiResponse::ok(
        state.catalog.read().await.viewer_section(&path)?,
    )))
}

/// Unknown paths render the default view with a 404 status.
pub async fn fallback_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<ViewerFallbackResponse>) {
    let editions = match state.catalog.read().await.viewer_editions() {
        Ok(editions) => editions,
        Err(e) => {
            tracing::error!("Default view unavailable: {}", e);
            Vec::new()
        }
    };
    (
        StatusCode::NOT_FOUND,
        Json(ViewerFallbackResponse {
            success: false,
            error: "Page not found".to_string(),
            editions,
        }),
    )
}
