//! # Core Type Definitions
//!
//! This module contains the record model of the scholarship catalog:
//! - Record identifiers (`EditionId`, `StageId`, `SectionId`, `ItemId`)
//! - The four record kinds (`Edition`, `Stage`, `Section`, `RequirementItem`)
//! - Requirement classification (`Category`, `Subcategory`)
//! - Error types (`CatalogError`, `ValidationErrors`)
//!
//! ## Tree Shape
//!
//! ```text
//! Edition ─┬─ Stage ─┬─ Section ─┬─ RequirementItem
//!          │         │           └─ RequirementItem
//!          │         └─ Section
//!          └─ Stage
//! ```
//!
//! Every child denormalizes the ids of all its ancestors so a record can be
//! located and scoped without walking the tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Assign a fresh store identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

record_id!(
    /// Identifier of a program edition (convocatoria).
    EditionId
);
record_id!(
    /// Identifier of a stage (etapa) within an edition.
    StageId
);
record_id!(
    /// Identifier of a section (sección) within a stage.
    SectionId
);
record_id!(
    /// Identifier of a requirement item (requisito) within a section.
    ItemId
);

// =============================================================================
// RECORD KIND
// =============================================================================

/// The four levels of the catalog tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Edition,
    Stage,
    Section,
    Item,
}

impl RecordKind {
    /// The kind one level below this one, if any.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::Edition => Some(Self::Stage),
            Self::Stage => Some(Self::Section),
            Self::Section => Some(Self::Item),
            Self::Item => None,
        }
    }

    /// Human-readable label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edition => "edition",
            Self::Stage => "stage",
            Self::Section => "section",
            Self::Item => "requirement item",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// REQUIREMENT CLASSIFICATION
// =============================================================================

/// Top-level requirement category.
///
/// The Spanish slugs used by the first console release are accepted on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "condiciones_previas")]
    PreConditions,
    #[default]
    #[serde(alias = "obligatorios")]
    Mandatory,
    #[serde(alias = "condicionales")]
    Conditional,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::PreConditions, Self::Mandatory, Self::Conditional];

    /// The subcategories allowed under this category.
    #[must_use]
    pub const fn subcategories(self) -> &'static [Subcategory] {
        match self {
            Self::PreConditions => &[Subcategory::Acceso, Subcategory::Participacion],
            Self::Mandatory => &[
                Subcategory::ConstanciaIes,
                Subcategory::CertificacionEducativa,
                Subcategory::AcreditacionRendimiento,
                Subcategory::CondicionSocioeconomica,
            ],
            Self::Conditional => &[
                Subcategory::Antecedentes,
                Subcategory::EstudiosSuperiores,
                Subcategory::DocumentacionAdicional,
            ],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreConditions => "pre_conditions",
            Self::Mandatory => "mandatory",
            Self::Conditional => "conditional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirement subcategory. Each one belongs to exactly one [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    Acceso,
    Participacion,
    ConstanciaIes,
    CertificacionEducativa,
    AcreditacionRendimiento,
    CondicionSocioeconomica,
    Antecedentes,
    EstudiosSuperiores,
    DocumentacionAdicional,
}

impl Subcategory {
    /// The category this subcategory is listed under.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Acceso | Self::Participacion => Category::PreConditions,
            Self::ConstanciaIes
            | Self::CertificacionEducativa
            | Self::AcreditacionRendimiento
            | Self::CondicionSocioeconomica => Category::Mandatory,
            Self::Antecedentes | Self::EstudiosSuperiores | Self::DocumentacionAdicional => {
                Category::Conditional
            }
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acceso => "acceso",
            Self::Participacion => "participacion",
            Self::ConstanciaIes => "constancia_ies",
            Self::CertificacionEducativa => "certificacion_educativa",
            Self::AcreditacionRendimiento => "acreditacion_rendimiento",
            Self::CondicionSocioeconomica => "condicion_socioeconomica",
            Self::Antecedentes => "antecedentes",
            Self::EstudiosSuperiores => "estudios_superiores",
            Self::DocumentacionAdicional => "documentacion_adicional",
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subcategory {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .flat_map(|c| c.subcategories().iter().copied())
            .find(|sub| sub.as_str() == s)
            .ok_or_else(|| {
                CatalogError::Validation(ValidationErrors::single(
                    "subcategory",
                    format!("Unknown subcategory '{}'", s),
                ))
            })
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One yearly instance of the scholarship program (convocatoria).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edition {
    pub id: EditionId,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A phase within an edition's process (etapa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: StageId,
    pub edition_id: EditionId,
    pub name: String,
    pub description: String,
    pub rank: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named content category within a stage (sección).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub edition_id: EditionId,
    pub stage_id: StageId,
    pub name: String,
    /// Short glyph shown next to the name.
    pub icon: String,
    /// Normalized slug (lowercase, whitespace runs replaced by `_`).
    pub content_type: String,
    pub rank: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single document or criterion an applicant must satisfy (requisito).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementItem {
    pub id: ItemId,
    pub edition_id: EditionId,
    pub stage_id: StageId,
    pub section_id: SectionId,
    /// Always matches `REQ-NN`.
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub subcategory: Subcategory,
    pub document_type: String,
    pub required_document: String,
    /// Never empty; every entry is non-blank.
    pub specifications: Vec<String>,
    pub notes: String,
    pub has_template: bool,
    pub template_url: Option<String>,
    pub has_example_image: bool,
    pub image_url: Option<String>,
    pub mandatory: bool,
    pub active: bool,
    pub rank: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Field-level validation messages, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one message.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message for a field. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no message was recorded.
    pub fn into_result(self) -> Result<(), CatalogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the catalog.
///
/// Validation failures are reported before any write is attempted.
/// Storage failures never leave a multi-record write half applied.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// One or more fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The record does not exist, or does not live under the given path.
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// The record still has children and the delete policy rejects it.
    #[error("{kind} still has {count} child record(s)")]
    HasChildren { kind: RecordKind, count: usize },

    /// Export was requested for an empty list.
    #[error("Nothing to export")]
    NothingToExport,

    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CatalogError {
    pub(crate) fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
