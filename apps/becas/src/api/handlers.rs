//! # Admin Console Handlers
//!
//! CRUD, move and seeding endpoints under `/admin`. Reads take the catalog
//! lock shared; every mutation takes it exclusively, so a move's
//! read-plan-commit sequence never interleaves with another write.

use super::{
    AppState,
    types::{ApiError, ApiResponse, HealthResponse, MoveRequest, PresetsResponse, StatusResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use becas_core::{
    CSV_CONTENT_TYPE, DeleteReport, Edition, EditionDraft, EditionId, EditionPatch, ItemPath,
    MoveOutcome, RequirementDraft, RequirementItem, RequirementPatch, Section, SectionDraft,
    SectionPatch, SectionPath, Stage, StageDraft, StagePatch, StagePath,
};
use chrono::Utc;

type Reply<T> = Result<Json<ApiResponse<T>>, ApiError>;
type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T>(data: T) -> Reply<T> {
    Ok(Json(ApiResponse::ok(data)))
}

fn created<T>(data: T) -> Created<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

// =============================================================================
// HEALTH & STATUS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Record counts and storage mode.
pub async fn status_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog.read().await;
    let response = StatusResponse {
        persistent: catalog.is_persistent(),
        delete_policy: catalog.delete_policy(),
        counts: catalog.counts()?,
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Ready-made stage names, section templates, icons and subcategories.
pub async fn presets_handler() -> impl IntoResponse {
    Json(ApiResponse::ok(PresetsResponse::default()))
}

// =============================================================================
// EDITIONS
// =============================================================================

pub async fn list_editions_handler(State(state): State<AppState>) -> Reply<Vec<Edition>> {
    ok(state.catalog.read().await.list_editions()?)
}

pub async fn create_edition_handler(
    State(state): State<AppState>,
    Json(draft): Json<EditionDraft>,
) -> Created<Edition> {
    let edition = state.catalog.write().await.create_edition(draft)?;
    tracing::info!(id = %edition.id, "Edition created");
    created(edition)
}

pub async fn get_edition_handler(
    State(state): State<AppState>,
    Path(id): Path<EditionId>,
) -> Reply<Edition> {
    ok(state.catalog.read().await.get_edition(&id)?)
}

pub async fn update_edition_handler(
    State(state): State<AppState>,
    Path(id): Path<EditionId>,
    Json(patch): Json<EditionPatch>,
) -> Reply<Edition> {
    ok(state.catalog.write().await.update_edition(&id, patch)?)
}

pub async fn delete_edition_handler(
    State(state): State<AppState>,
    Path(id): Path<EditionId>,
) -> Reply<DeleteReport> {
    let report = state.catalog.write().await.delete_edition(&id)?;
    tracing::info!(id = %id, removed = report.removed, "Edition deleted");
    ok(report)
}

/// Download every edition as CSV.
pub async fn export_csv_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let export = state
        .catalog
        .read()
        .await
        .export_editions_csv(Utc::now().date_naive())?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    ))
}

/// CSV import is declared but not available.
pub async fn import_handler() -> Result<(), ApiError> {
    Err(ApiError::NotImplemented("CSV import"))
}

// =============================================================================
// STAGES
// =============================================================================

pub async fn list_stages_handler(
    State(state): State<AppState>,
    Path(edition_id): Path<EditionId>,
) -> Reply<Vec<Stage>> {
    ok(state.catalog.read().await.list_stages(&edition_id)?)
}

pub async fn create_stage_handler(
    State(state): State<AppState>,
    Path(edition_id): Path<EditionId>,
    Json(draft): Json<StageDraft>,
) -> Created<Stage> {
    created(state.catalog.write().await.create_stage(&edition_id, draft)?)
}

pub async fn get_stage_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
) -> Reply<Stage> {
    ok(state.catalog.read().await.get_stage(&path)?)
}

pub async fn update_stage_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
    Json(patch): Json<StagePatch>,
) -> Reply<Stage> {
    ok(state.catalog.write().await.update_stage(&path, patch)?)
}

pub async fn delete_stage_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
) -> Reply<DeleteReport> {
    ok(state.catalog.write().await.delete_stage(&path)?)
}

pub async fn move_stage_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
    Json(request): Json<MoveRequest>,
) -> Reply<MoveOutcome<Stage>> {
    ok(state
        .catalog
        .write()
        .await
        .move_stage(&path, request.direction)?)
}

// =============================================================================
// SECTIONS
// =============================================================================

pub async fn list_sections_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
) -> Reply<Vec<Section>> {
    ok(state.catalog.read().await.list_sections(&path)?)
}

pub async fn create_section_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
    Json(draft): Json<SectionDraft>,
) -> Created<Section> {
    created(state.catalog.write().await.create_section(&path, draft)?)
}

/// Append the five preset sections to a stage.
pub async fn seed_sections_handler(
    State(state): State<AppState>,
    Path(path): Path<StagePath>,
) -> Created<Vec<Section>> {
    let sections = state.catalog.write().await.seed_preset_sections(&path)?;
    tracing::info!(stage = %path.stage_id, count = sections.len(), "Preset sections seeded");
    created(sections)
}

pub async fn get_section_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
) -> Reply<Section> {
    ok(state.catalog.read().await.get_section(&path)?)
}

pub async fn update_section_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
    Json(patch): Json<SectionPatch>,
) -> Reply<Section> {
    ok(state.catalog.write().await.update_section(&path, patch)?)
}

pub async fn delete_section_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
) -> Reply<DeleteReport> {
    ok(state.catalog.write().await.delete_section(&path)?)
}

pub async fn move_section_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
    Json(request): Json<MoveRequest>,
) -> Reply<MoveOutcome<Section>> {
    ok(state
        .catalog
        .write()
        .await
        .move_section(&path, request.direction)?)
}

// =============================================================================
// REQUIREMENT ITEMS
// =============================================================================

pub async fn list_items_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
) -> Reply<Vec<RequirementItem>> {
    ok(state.catalog.read().await.list_items(&path)?)
}

pub async fn create_item_handler(
    State(state): State<AppState>,
    Path(path): Path<SectionPath>,
    Json(draft): Json<RequirementDraft>,
) -> Created<RequirementItem> {
    created(state.catalog.write().await.create_item(&path, draft)?)
}

pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Reply<RequirementItem> {
    ok(state.catalog.read().await.get_item(&path)?)
}

pub async fn update_item_handler(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Json(patch): Json<RequirementPatch>,
) -> Reply<RequirementItem> {
    ok(state.catalog.write().await.update_item(&path, patch)?)
}

pub async fn delete_item_handler(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Reply<DeleteReport> {
    ok(state.catalog.write().await.delete_item(&path)?)
}

pub async fn move_item_handler(
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Json(request): Json<MoveRequest>,
) -> Reply<MoveOutcome<RequirementItem>> {
    ok(state
        .catalog
        .write()
        .await
        .move_item(&path, request.direction)?)
}
