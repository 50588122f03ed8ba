//! # Drafts, Patches and Field Validation
//!
//! A *draft* is the full set of editable fields of a record, as submitted by
//! the console form. A *patch* names only the fields to change. Both are
//! normalized (trimmed, blank specifications dropped, content type slugged)
//! and validated synchronously before any write reaches the store.
//!
//! Validation never stops at the first problem: every failing field gets
//! its own message so the form can render them inline.

use crate::types::{
    Category, Edition, RequirementItem, Section, Stage, Subcategory, ValidationErrors,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// =============================================================================
// LIMITS
// =============================================================================

/// Minimum length of any record name.
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum length of an optional description, when one is given.
pub const MIN_DESCRIPTION_LENGTH: usize = 10;

/// Minimum length of a requirement title.
pub const MIN_TITLE_LENGTH: usize = 5;

/// Minimum length of a requirement description (always required).
pub const MIN_REQUIREMENT_DESCRIPTION_LENGTH: usize = 20;

/// Minimum length of a section content type.
pub const MIN_CONTENT_TYPE_LENGTH: usize = 2;

/// First edition year accepted by the console.
pub const FIRST_EDITION_YEAR: i32 = 2020;

/// How many years past the current one an edition may be planned.
pub const MAX_YEARS_AHEAD: i32 = 5;

static REQUIREMENT_CODE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^REQ-\d{2}$"));

/// `true` if `code` has the `REQ-NN` shape (exactly two digits).
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    REQUIREMENT_CODE
        .as_ref()
        .is_ok_and(|re| re.is_match(code))
}

/// Lowercase the slug and collapse each whitespace run to a single `_`.
#[must_use]
pub fn normalize_content_type(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn check_name(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.is_empty() {
        errors.add(field, format!("{} is required", field));
    } else if char_len(value) < min {
        errors.add(field, format!("{} must be at least {} characters", field, min));
    }
}

fn check_optional_description(errors: &mut ValidationErrors, value: &str) {
    if !value.is_empty() && char_len(value) < MIN_DESCRIPTION_LENGTH {
        errors.add(
            "description",
            format!(
                "description must be at least {} characters",
                MIN_DESCRIPTION_LENGTH
            ),
        );
    }
}

fn default_true() -> bool {
    true
}

fn trim_owned(s: &str) -> String {
    s.trim().to_string()
}

// =============================================================================
// EDITION
// =============================================================================

/// Editable fields of an [`Edition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionDraft {
    #[serde(default)]
    pub name: String,
    /// Required; `None` models an empty year input.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl EditionDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year: Some(year),
            description: String::new(),
            active: true,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: trim_owned(&self.name),
            year: self.year,
            description: trim_owned(&self.description),
            active: self.active,
        }
    }

    /// Validate a normalized draft against the given calendar year.
    #[must_use]
    pub fn validate(&self, current_year: i32) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name, MIN_NAME_LENGTH);
        let last_year = current_year.saturating_add(MAX_YEARS_AHEAD);
        match self.year {
            None => errors.add("year", "year is required"),
            Some(y) if !(FIRST_EDITION_YEAR..=last_year).contains(&y) => errors.add(
                "year",
                format!(
                    "year must be between {} and {}",
                    FIRST_EDITION_YEAR, last_year
                ),
            ),
            Some(_) => {}
        }
        check_optional_description(&mut errors, &self.description);
        errors
    }
}

impl From<&Edition> for EditionDraft {
    fn from(e: &Edition) -> Self {
        Self {
            name: e.name.clone(),
            year: Some(e.year),
            description: e.description.clone(),
            active: e.active,
        }
    }
}

/// Partial update of an [`Edition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditionPatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl EditionPatch {
    pub fn apply(self, draft: &mut EditionDraft) {
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.year {
            draft.year = Some(v);
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.active {
            draft.active = v;
        }
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// Editable fields of a [`Stage`]. The rank is assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl StageDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            active: true,
        }
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: trim_owned(&self.name),
            description: trim_owned(&self.description),
            active: self.active,
        }
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name, MIN_NAME_LENGTH);
        check_optional_description(&mut errors, &self.description);
        errors
    }
}

impl From<&Stage> for StageDraft {
    fn from(s: &Stage) -> Self {
        Self {
            name: s.name.clone(),
            description: s.description.clone(),
            active: s.active,
        }
    }
}

/// Partial update of a [`Stage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StagePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl StagePatch {
    pub fn apply(self, draft: &mut StageDraft) {
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.active {
            draft.active = v;
        }
    }
}

// =============================================================================
// SECTION
// =============================================================================

/// Editable fields of a [`Section`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl SectionDraft {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            content_type: content_type.into(),
            active: true,
        }
    }

    /// Trim every field. The content type is validated as typed and only
    /// slugged with [`normalize_content_type`] when stored.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: trim_owned(&self.name),
            icon: trim_owned(&self.icon),
            content_type: trim_owned(&self.content_type),
            active: self.active,
        }
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, "name", &self.name, MIN_NAME_LENGTH);
        if self.icon.is_empty() {
            errors.add("icon", "icon is required");
        }
        check_name(
            &mut errors,
            "contentType",
            &self.content_type,
            MIN_CONTENT_TYPE_LENGTH,
        );
        errors
    }
}

impl From<&Section> for SectionDraft {
    fn from(s: &Section) -> Self {
        Self {
            name: s.name.clone(),
            icon: s.icon.clone(),
            content_type: s.content_type.clone(),
            active: s.active,
        }
    }
}

/// Partial update of a [`Section`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub content_type: Option<String>,
    pub active: Option<bool>,
}

impl SectionPatch {
    pub fn apply(self, draft: &mut SectionDraft) {
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.icon {
            draft.icon = v;
        }
        if let Some(v) = self.content_type {
            draft.content_type = v;
        }
        if let Some(v) = self.active {
            draft.active = v;
        }
    }
}

// =============================================================================
// REQUIREMENT ITEM
// =============================================================================

/// Editable fields of a [`RequirementItem`].
///
/// `subcategory` stays a raw string here: the form may hold an empty or
/// stale value until validation resolves it against `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDraft {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub required_document: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub has_template: bool,
    #[serde(default)]
    pub template_url: String,
    #[serde(default)]
    pub has_example_image: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_true")]
    pub mandatory: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Default for RequirementDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            title: String::new(),
            description: String::new(),
            category: Category::default(),
            subcategory: String::new(),
            document_type: String::new(),
            required_document: String::new(),
            specifications: vec![String::new()],
            notes: String::new(),
            has_template: false,
            template_url: String::new(),
            has_example_image: false,
            image_url: String::new(),
            mandatory: true,
            active: true,
        }
    }
}

impl RequirementDraft {
    /// Switch category, clearing a subcategory the new category does not list.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        if self.resolved_subcategory().is_none() {
            self.subcategory.clear();
        }
    }

    /// The subcategory, if it parses and belongs to the current category.
    #[must_use]
    pub fn resolved_subcategory(&self) -> Option<Subcategory> {
        self.subcategory
            .trim()
            .parse::<Subcategory>()
            .ok()
            .filter(|sub| sub.category() == self.category)
    }

    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            code: trim_owned(&self.code),
            title: trim_owned(&self.title),
            description: trim_owned(&self.description),
            category: self.category,
            subcategory: trim_owned(&self.subcategory),
            document_type: trim_owned(&self.document_type),
            required_document: trim_owned(&self.required_document),
            specifications: self
                .specifications
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            notes: trim_owned(&self.notes),
            has_template: self.has_template,
            template_url: trim_owned(&self.template_url),
            has_example_image: self.has_example_image,
            image_url: trim_owned(&self.image_url),
            mandatory: self.mandatory,
            active: self.active,
        }
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.code.is_empty() {
            errors.add("code", "code is required");
        } else if !is_valid_code(&self.code) {
            errors.add("code", "code must have the format REQ-01");
        }

        check_name(&mut errors, "title", &self.title, MIN_TITLE_LENGTH);

        if self.description.is_empty() {
            errors.add("description", "description is required");
        } else if char_len(&self.description) < MIN_REQUIREMENT_DESCRIPTION_LENGTH {
            errors.add(
                "description",
                format!(
                    "description must be at least {} characters",
                    MIN_REQUIREMENT_DESCRIPTION_LENGTH
                ),
            );
        }

        if self.subcategory.is_empty() {
            errors.add("subcategory", "subcategory is required");
        } else if self.resolved_subcategory().is_none() {
            errors.add(
                "subcategory",
                format!(
                    "subcategory '{}' is not valid for category {}",
                    self.subcategory, self.category
                ),
            );
        }

        if !self.specifications.iter().any(|s| !s.trim().is_empty()) {
            errors.add(
                "specifications",
                "at least one specification is required",
            );
        }

        errors
    }
}

impl From<&RequirementItem> for RequirementDraft {
    fn from(item: &RequirementItem) -> Self {
        Self {
            code: item.code.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category,
            subcategory: item.subcategory.as_str().to_string(),
            document_type: item.document_type.clone(),
            required_document: item.required_document.clone(),
            specifications: item.specifications.clone(),
            notes: item.notes.clone(),
            has_template: item.has_template,
            template_url: item.template_url.clone().unwrap_or_default(),
            has_example_image: item.has_example_image,
            image_url: item.image_url.clone().unwrap_or_default(),
            mandatory: item.mandatory,
            active: item.active,
        }
    }
}

/// Partial update of a [`RequirementItem`].
///
/// A category change is applied before the subcategory, so a patch that
/// only changes the category clears an incompatible subcategory and then
/// fails validation until a matching one is supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequirementPatch {
    pub code: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub document_type: Option<String>,
    pub required_document: Option<String>,
    pub specifications: Option<Vec<String>>,
    pub notes: Option<String>,
    pub has_template: Option<bool>,
    pub template_url: Option<String>,
    pub has_example_image: Option<bool>,
    pub image_url: Option<String>,
    pub mandatory: Option<bool>,
    pub active: Option<bool>,
}

impl RequirementPatch {
    pub fn apply(self, draft: &mut RequirementDraft) {
        if let Some(v) = self.category {
            draft.set_category(v);
        }
        if let Some(v) = self.subcategory {
            draft.subcategory = v;
        }
        if let Some(v) = self.code {
            draft.code = v;
        }
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.document_type {
            draft.document_type = v;
        }
        if let Some(v) = self.required_document {
            draft.required_document = v;
        }
        if let Some(v) = self.specifications {
            draft.specifications = v;
        }
        if let Some(v) = self.notes {
            draft.notes = v;
        }
        if let Some(v) = self.has_template {
            draft.has_template = v;
        }
        if let Some(v) = self.template_url {
            draft.template_url = v;
        }
        if let Some(v) = self.has_example_image {
            draft.has_example_image = v;
        }
        if let Some(v) = self.image_url {
            draft.image_url = v;
        }
        if let Some(v) = self.mandatory {
            draft.mandatory = v;
        }
        if let Some(v) = self.active {
            draft.active = v;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_requirement() -> RequirementDraft {
        RequirementDraft {
            code: "REQ-01".to_string(),
            title: "Constancia de ingreso".to_string(),
            description: "Documento emitido por la IES que acredita el ingreso".to_string(),
            category: Category::Mandatory,
            subcategory: "constancia_ies".to_string(),
            specifications: vec!["Debe ser oficial".to_string()],
            ..RequirementDraft::default()
        }
    }

    #[test]
    fn code_pattern_requires_exactly_two_digits() {
        assert!(is_valid_code("REQ-01"));
        assert!(is_valid_code("REQ-99"));
        assert!(!is_valid_code("REQ-1"));
        assert!(!is_valid_code("REQ-001"));
        assert!(!is_valid_code("req-01"));
        assert!(!is_valid_code(" REQ-01"));
    }

    #[test]
    fn edition_rules() {
        let ok = EditionDraft::new("Beca 18 - 2025", 2025).normalized();
        assert!(ok.validate(2025).is_empty());

        let errors = EditionDraft::new("  ab ", 2019).normalized().validate(2025);
        assert!(errors.get("name").is_some());
        assert!(errors.get("year").is_some());

        let far = EditionDraft::new("Beca 18", 2031).validate(2025);
        assert!(far.get("year").is_some());
        assert!(EditionDraft::new("Beca 18", 2030).validate(2025).is_empty());

        let mut missing_year = EditionDraft::new("Beca 18", 2025);
        missing_year.year = None;
        assert_eq!(
            missing_year.validate(2025).get("year"),
            Some("year is required")
        );

        let short = EditionDraft::new("Beca 18", 2025).with_description("corta");
        assert!(short.validate(2025).get("description").is_some());
    }

    #[test]
    fn stage_description_is_optional_but_bounded() {
        assert!(StageDraft::new("Etapa de Selección").validate().is_empty());
        let mut draft = StageDraft::new("Etapa de Selección");
        draft.description = "breve".to_string();
        assert!(draft.validate().get("description").is_some());
    }

    #[test]
    fn section_requires_icon_and_content_type() {
        let errors = SectionDraft::new("Requisitos", "", "r").validate();
        assert!(errors.get("icon").is_some());
        assert!(errors.get("contentType").is_some());
        assert!(errors.get("name").is_none());
    }

    #[test]
    fn content_type_is_slugged() {
        assert_eq!(normalize_content_type("  Preguntas   Frecuentes "), "preguntas_frecuentes");
        assert_eq!(normalize_content_type("REQUISITOS"), "requisitos");
    }

    #[test]
    fn requirement_valid_draft_passes() {
        assert!(valid_requirement().normalized().validate().is_empty());
    }

    #[test]
    fn requirement_rejects_short_code() {
        let mut draft = valid_requirement();
        draft.code = "REQ-1".to_string();
        assert_eq!(
            draft.validate().get("code"),
            Some("code must have the format REQ-01")
        );
    }

    #[test]
    fn requirement_needs_a_non_blank_specification() {
        let mut draft = valid_requirement();
        draft.specifications = vec!["   ".to_string(), String::new()];
        assert!(draft.validate().get("specifications").is_some());
        assert!(draft.normalized().specifications.is_empty());
    }

    #[test]
    fn category_change_clears_incompatible_subcategory() {
        let mut draft = valid_requirement();
        draft.set_category(Category::Conditional);
        assert!(draft.subcategory.is_empty());
        assert_eq!(
            draft.validate().get("subcategory"),
            Some("subcategory is required")
        );
    }

    #[test]
    fn category_change_keeps_compatible_subcategory() {
        let mut draft = valid_requirement();
        draft.set_category(Category::Mandatory);
        assert_eq!(draft.subcategory, "constancia_ies");
    }

    #[test]
    fn subcategory_from_other_category_is_rejected() {
        let mut draft = valid_requirement();
        draft.subcategory = "acceso".to_string();
        assert!(draft.validate().get("subcategory").is_some());
    }

    #[test]
    fn patch_applies_category_before_subcategory() {
        let mut draft = valid_requirement();
        RequirementPatch {
            category: Some(Category::PreConditions),
            subcategory: Some("participacion".to_string()),
            ..RequirementPatch::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.resolved_subcategory(), Some(Subcategory::Participacion));
        assert!(draft.validate().is_empty());
    }
}
