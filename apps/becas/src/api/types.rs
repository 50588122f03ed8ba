//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Successful responses wrap their payload as `{ "success": true, "data": ... }`.
//! Failures use [`ErrorResponse`]: `{ "success": false, "error": ..., "fields": {...} }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use becas_core::{
    COMMON_ICONS, CatalogCounts, CatalogError, Category, DeletePolicy, Direction, Edition,
    SECTION_TEMPLATES, STAGE_NAMES, SectionTemplate, Subcategory, ValidationErrors,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Field-level validation messages; empty for other errors.
    #[serde(default)]
    pub fields: ValidationErrors,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            fields: ValidationErrors::new(),
        }
    }
}

// =============================================================================
// API ERROR
// =============================================================================

/// Error returned by handlers; renders as [`ErrorResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Catalog(e) => match e {
                CatalogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CatalogError::NotFound { .. } | CatalogError::NothingToExport => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::HasChildren { .. } => StatusCode::CONFLICT,
                CatalogError::Storage(_) | CatalogError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Catalog(CatalogError::Validation(fields)) => ErrorResponse {
                success: false,
                error: "Validation failed".to_string(),
                fields,
            },
            other => {
                if matches!(other, Self::Catalog(_)) && status.is_server_error() {
                    tracing::error!("Catalog failure: {}", other);
                }
                ErrorResponse::new(other.to_string())
            }
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// HEALTH & STATUS
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Catalog status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub persistent: bool,
    pub delete_policy: DeletePolicy,
    pub counts: CatalogCounts,
}

// =============================================================================
// MOVE
// =============================================================================

/// Body of a `.../move` request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

// =============================================================================
// PRESETS
// =============================================================================

/// Subcategories offered for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOptions {
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
}

/// Everything the console forms offer as ready-made choices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    pub stage_names: Vec<&'static str>,
    pub section_templates: Vec<SectionTemplate>,
    pub icons: Vec<&'static str>,
    pub categories: Vec<CategoryOptions>,
}

impl Default for PresetsResponse {
    fn default() -> Self {
        Self {
            stage_names: STAGE_NAMES.to_vec(),
            section_templates: SECTION_TEMPLATES.to_vec(),
            icons: COMMON_ICONS.to_vec(),
            categories: Category::ALL
                .iter()
                .map(|&category| CategoryOptions {
                    category,
                    subcategories: category.subcategories().to_vec(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// VIEWER FALLBACK
// =============================================================================

/// Body served for unknown public paths: the default view plus an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerFallbackResponse {
    pub success: bool,
    pub error: String,
    pub editions: Vec<Edition>,
}
