//! # Public Viewer Queries
//!
//! Read-only navigation used by the public site: active editions, their
//! active stages and sections, and the content of one section. Anything
//! inactive along the path reads as `NotFound`.

use crate::catalog::{Catalog, SectionPath, StagePath};
use crate::presets::REQUIREMENTS_CONTENT_TYPE;
use crate::store::ContentStore;
use crate::types::{CatalogError, Edition, EditionId, RecordKind, RequirementItem, Section, Stage};
use serde::Serialize;

/// Body of a section as shown to applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum SectionContent {
    /// Active requirement items, by rank.
    Requirements(Vec<RequirementItem>),
    /// Content types without a public renderer yet.
    UnderDevelopment,
}

/// One section with its rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: Section,
    pub content: SectionContent,
}

impl<S: ContentStore> Catalog<S> {
    fn active_edition(&self, id: &EditionId) -> Result<Edition, CatalogError> {
        Some(self.get_edition(id)?)
            .filter(|e| e.active)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Edition, id.as_str()))
    }

    fn active_stage(&self, path: &StagePath) -> Result<Stage, CatalogError> {
        self.active_edition(&path.edition_id)?;
        Some(self.get_stage(path)?)
            .filter(|s| s.active)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Stage, path.stage_id.as_str()))
    }

    /// Editions offered in the public dropdown.
    pub fn viewer_editions(&self) -> Result<Vec<Edition>, CatalogError> {
        self.list_active_editions()
    }

    pub fn viewer_stages(&self, edition_id: &EditionId) -> Result<Vec<Stage>, CatalogError> {
        self.active_edition(edition_id)?;
        Ok(self
            .list_stages(edition_id)?
            .into_iter()
            .filter(|s| s.active)
            .collect())
    }

    pub fn viewer_sections(&self, path: &StagePath) -> Result<Vec<Section>, CatalogError> {
        self.active_stage(path)?;
        Ok(self
            .list_sections(path)?
            .into_iter()
            .filter(|s| s.active)
            .collect())
    }

    pub fn viewer_section(&self, path: &SectionPath) -> Result<SectionView, CatalogError> {
        self.active_stage(&path.stage())?;
        let section = Some(self.get_section(path)?)
            .filter(|s| s.active)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Section, path.section_id.as_str()))?;

        let content = if section.content_type == REQUIREMENTS_CONTENT_TYPE {
            SectionContent::Requirements(
                self.list_items(path)?
                    .into_iter()
                    .filter(|i| i.active)
                    .collect(),
            )
        } else {
            SectionContent::UnderDevelopment
        };

        Ok(SectionView { section, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::validation::{EditionDraft, EditionPatch, SectionDraft, StageDraft, StagePatch};

    fn setup() -> (Catalog<MemoryStore>, StagePath) {
        let mut catalog = Catalog::new(MemoryStore::new());
        let edition = catalog
            .create_edition(EditionDraft::new("Beca 18 - 2025", 2025))
            .expect("edition");
        let stage = catalog
            .create_stage(&edition.id, StageDraft::new("Etapa de Selección"))
            .expect("stage");
        (catalog, StagePath::new(edition.id, stage.id))
    }

    #[test]
    fn non_requirement_sections_are_under_development() {
        let (mut catalog, path) = setup();
        let section = catalog
            .create_section(&path, SectionDraft::new("Cronograma", "📅", "cronograma"))
            .expect("section");
        let view = catalog
            .viewer_section(&path.section(section.id))
            .expect("view");
        assert_eq!(view.content, SectionContent::UnderDevelopment);
    }

    #[test]
    fn requirement_sections_list_items() {
        let (mut catalog, path) = setup();
        let section = catalog
            .create_section(&path, SectionDraft::new("Requisitos", "📄", "Requisitos"))
            .expect("section");
        let view = catalog
            .viewer_section(&path.section(section.id))
            .expect("view");
        assert_eq!(view.content, SectionContent::Requirements(Vec::new()));
    }

    #[test]
    fn inactive_stage_is_hidden() {
        let (mut catalog, path) = setup();
        catalog
            .update_stage(
                &path,
                StagePatch {
                    active: Some(false),
                    ..StagePatch::default()
                },
            )
            .expect("deactivate");
        assert!(
            catalog
                .viewer_stages(&path.edition_id)
                .expect("stages")
                .is_empty()
        );
        assert!(matches!(
            catalog.viewer_sections(&path),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn inactive_edition_is_not_offered() {
        let (mut catalog, path) = setup();
        catalog
            .update_edition(
                &path.edition_id,
                EditionPatch {
                    active: Some(false),
                    ..EditionPatch::default()
                },
            )
            .expect("deactivate");
        assert!(catalog.viewer_editions().expect("editions").is_empty());
        assert!(catalog.viewer_stages(&path.edition_id).is_err());
    }
}
