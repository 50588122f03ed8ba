//! # becas-core
//!
//! The content catalog engine for Becas - THE LOGIC.
//!
//! This crate owns the record tree of a scholarship program:
//!
//! ```text
//! Edition (convocatoria) → Stage (etapa) → Section (sección) → RequirementItem (requisito)
//! ```
//!
//! It validates console input, keeps sibling ranks unique, and persists
//! records through a pluggable [`ContentStore`] (in-memory or redb).
//!
//! ## Architectural Constraints
//!
//! - Pure, synchronous Rust: no async, no network
//! - Every record is a fixed, typed struct
//! - Every mutation is one atomic [`WriteBatch`]
//! - Errors are values ([`CatalogError`]); logging is the app's concern

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod export;
pub mod ordering;
pub mod presets;
pub mod store;
pub mod types;
pub mod validation;
pub mod viewer;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    CatalogError, Category, Edition, EditionId, ItemId, RecordKind, RequirementItem, Section,
    SectionId, Stage, StageId, Subcategory, ValidationErrors,
};

// =============================================================================
// RE-EXPORTS: Catalog
// =============================================================================

pub use catalog::{
    Catalog, CatalogCounts, DeletePolicy, DeleteReport, ItemPath, MoveOutcome, SectionPath,
    StagePath,
};
pub use export::{CSV_CONTENT_TYPE, CSV_HEADERS, CsvExport, editions_to_csv, export_file_name};
pub use ordering::{Direction, Unchanged};
pub use presets::{COMMON_ICONS, SECTION_TEMPLATES, STAGE_NAMES, SectionTemplate};
pub use store::{ContentStore, MemoryStore, RedbStore, StorageBackend, WriteBatch};
pub use validation::{
    EditionDraft, EditionPatch, RequirementDraft, RequirementPatch, SectionDraft, SectionPatch,
    StageDraft, StagePatch,
};
pub use viewer::{SectionContent, SectionView};
