//! # Catalog Service
//!
//! The [`Catalog`] owns a [`ContentStore`] and exposes every console
//! operation over the four-level record tree: create, read, list, patch,
//! delete and move, plus preset seeding and CSV export.
//!
//! Nested operations take an explicit path ([`StagePath`], [`SectionPath`],
//! [`ItemPath`]). A record whose denormalized ancestor ids do not match the
//! path is reported as `NotFound`, exactly as if it did not exist.
//!
//! ## Write Discipline
//!
//! - Drafts and patches are normalized and validated before the store is
//!   touched.
//! - Ranks for new records are computed from siblings read fresh from the
//!   store.
//! - Every mutation is a single [`WriteBatch`]. Rank swaps, preset seeding
//!   and cascade deletes touch several records and land all at once or not
//!   at all.

use crate::export::{CsvExport, export_editions};
use crate::ordering::{Direction, MovePlan, Ranked, Unchanged, apply_swap, next_rank, plan_move};
use crate::presets::seeded_sections;
use crate::store::{ContentStore, Record, StorageBackend, WriteBatch, children_of, fetch, fetch_all};
use crate::types::{
    CatalogError, Edition, EditionId, ItemId, RecordKind, RequirementItem, Section, SectionId,
    Stage, StageId, Subcategory, ValidationErrors,
};
use crate::validation::{
    EditionDraft, EditionPatch, RequirementDraft, RequirementPatch, SectionDraft, SectionPatch,
    StageDraft, StagePatch, normalize_content_type,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// DELETE POLICY
// =============================================================================

/// What happens when a record that still has children is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse with `HasChildren`; nothing is removed.
    #[default]
    Reject,
    /// Remove the record and its whole subtree in one batch.
    Cascade,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "cascade" => Ok(Self::Cascade),
            other => Err(format!(
                "Unknown delete policy: {}. Use: reject, cascade",
                other
            )),
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Cascade => f.write_str("cascade"),
        }
    }
}

// =============================================================================
// PATHS
// =============================================================================

/// Location of a stage: edition → stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagePath {
    pub edition_id: EditionId,
    pub stage_id: StageId,
}

impl StagePath {
    pub fn new(edition_id: impl Into<EditionId>, stage_id: impl Into<StageId>) -> Self {
        Self {
            edition_id: edition_id.into(),
            stage_id: stage_id.into(),
        }
    }

    /// Path of a section inside this stage.
    #[must_use]
    pub fn section(&self, section_id: impl Into<SectionId>) -> SectionPath {
        SectionPath {
            edition_id: self.edition_id.clone(),
            stage_id: self.stage_id.clone(),
            section_id: section_id.into(),
        }
    }
}

/// Location of a section: edition → stage → section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPath {
    pub edition_id: EditionId,
    pub stage_id: StageId,
    pub section_id: SectionId,
}

impl SectionPath {
    pub fn new(
        edition_id: impl Into<EditionId>,
        stage_id: impl Into<StageId>,
        section_id: impl Into<SectionId>,
    ) -> Self {
        Self {
            edition_id: edition_id.into(),
            stage_id: stage_id.into(),
            section_id: section_id.into(),
        }
    }

    /// The enclosing stage.
    #[must_use]
    pub fn stage(&self) -> StagePath {
        StagePath {
            edition_id: self.edition_id.clone(),
            stage_id: self.stage_id.clone(),
        }
    }

    /// Path of an item inside this section.
    #[must_use]
    pub fn item(&self, item_id: impl Into<ItemId>) -> ItemPath {
        ItemPath {
            edition_id: self.edition_id.clone(),
            stage_id: self.stage_id.clone(),
            section_id: self.section_id.clone(),
            item_id: item_id.into(),
        }
    }
}

/// Location of a requirement item: edition → stage → section → item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPath {
    pub edition_id: EditionId,
    pub stage_id: StageId,
    pub section_id: SectionId,
    pub item_id: ItemId,
}

impl ItemPath {
    /// The enclosing section.
    #[must_use]
    pub fn section(&self) -> SectionPath {
        SectionPath {
            edition_id: self.edition_id.clone(),
            stage_id: self.stage_id.clone(),
            section_id: self.section_id.clone(),
        }
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome<R> {
    /// Both records were rewritten with exchanged ranks.
    Swapped { moved: R, displaced: R },
    /// The group was left as it was.
    Unchanged { reason: Unchanged },
}

impl<R> MoveOutcome<R> {
    #[must_use]
    pub fn is_swapped(&self) -> bool {
        matches!(self, Self::Swapped { .. })
    }
}

/// What a delete removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub kind: RecordKind,
    pub id: String,
    /// Records removed, the target included.
    pub removed: usize,
}

/// Number of stored records per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    pub editions: usize,
    pub stages: usize,
    pub sections: usize,
    pub items: usize,
}

impl CatalogCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.editions + self.stages + self.sections + self.items
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn sort_by_rank<R: Ranked>(records: &mut [R]) {
    records.sort_by(|a, b| {
        a.rank()
            .cmp(&b.rank())
            .then_with(|| a.rank_key().cmp(b.rank_key()))
    });
}

fn sort_editions(editions: &mut [Edition]) {
    editions.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.name.cmp(&b.name)));
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn resolve_subcategory(draft: &RequirementDraft) -> Result<Subcategory, CatalogError> {
    draft.resolved_subcategory().ok_or_else(|| {
        CatalogError::Validation(ValidationErrors::single(
            "subcategory",
            "subcategory is required",
        ))
    })
}

/// Copy a validated requirement draft onto an item.
fn fill_item(item: &mut RequirementItem, draft: RequirementDraft) -> Result<(), CatalogError> {
    let subcategory = resolve_subcategory(&draft)?;
    item.code = draft.code;
    item.title = draft.title;
    item.description = draft.description;
    item.category = draft.category;
    item.subcategory = subcategory;
    item.document_type = draft.document_type;
    item.required_document = draft.required_document;
    item.specifications = draft.specifications;
    item.notes = draft.notes;
    item.has_template = draft.has_template;
    item.template_url = non_empty(draft.template_url);
    item.has_example_image = draft.has_example_image;
    item.image_url = non_empty(draft.image_url);
    item.mandatory = draft.mandatory;
    item.active = draft.active;
    Ok(())
}

fn new_section(path: &StagePath, draft: SectionDraft, rank: u32, now: DateTime<Utc>) -> Section {
    Section {
        id: SectionId::generate(),
        edition_id: path.edition_id.clone(),
        stage_id: path.stage_id.clone(),
        name: draft.name,
        icon: draft.icon,
        content_type: normalize_content_type(&draft.content_type),
        rank,
        active: draft.active,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// The scholarship content catalog.
#[derive(Debug, Default)]
pub struct Catalog<S: ContentStore = StorageBackend> {
    store: S,
    delete_policy: DeletePolicy,
}

impl Catalog<StorageBackend> {
    /// A catalog over volatile in-memory tables.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::default())
    }

    /// A catalog over a redb file, created if missing.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Ok(Self::new(StorageBackend::redb(path)?))
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }
}

impl<S: ContentStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            delete_policy: DeletePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn set_delete_policy(&mut self, policy: DeletePolicy) {
        self.delete_policy = policy;
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn put_one<R: Record>(&mut self, record: &R) -> Result<(), CatalogError> {
        let mut batch = WriteBatch::new();
        batch.put(record)?;
        self.store.commit(batch)
    }

    // =========================================================================
    // EDITIONS
    // =========================================================================

    pub fn create_edition(&mut self, draft: EditionDraft) -> Result<Edition, CatalogError> {
        let now = Utc::now();
        let draft = draft.normalized();
        draft.validate(now.year()).into_result()?;

        let edition = Edition {
            id: EditionId::generate(),
            name: draft.name,
            year: draft.year.unwrap_or_default(),
            description: draft.description,
            active: draft.active,
            created_at: now,
            updated_at: now,
        };
        self.put_one(&edition)?;
        Ok(edition)
    }

    pub fn get_edition(&self, id: &EditionId) -> Result<Edition, CatalogError> {
        fetch::<Edition, S>(&self.store, id.as_str())?
            .ok_or_else(|| CatalogError::not_found(RecordKind::Edition, id.as_str()))
    }

    /// All editions, newest year first, then by name.
    pub fn list_editions(&self) -> Result<Vec<Edition>, CatalogError> {
        let mut editions = fetch_all::<Edition, S>(&self.store)?;
        sort_editions(&mut editions);
        Ok(editions)
    }

    /// Active editions only, in [`Self::list_editions`] order.
    pub fn list_active_editions(&self) -> Result<Vec<Edition>, CatalogError> {
        Ok(self
            .list_editions()?
            .into_iter()
            .filter(|e| e.active)
            .collect())
    }

    pub fn update_edition(
        &mut self,
        id: &EditionId,
        patch: EditionPatch,
    ) -> Result<Edition, CatalogError> {
        let mut edition = self.get_edition(id)?;
        let mut draft = EditionDraft::from(&edition);
        patch.apply(&mut draft);
        let draft = draft.normalized();
        let now = Utc::now();
        draft.validate(now.year()).into_result()?;

        edition.name = draft.name;
        edition.year = draft.year.unwrap_or(edition.year);
        edition.description = draft.description;
        edition.active = draft.active;
        edition.touch(now);
        self.put_one(&edition)?;
        Ok(edition)
    }

    pub fn delete_edition(&mut self, id: &EditionId) -> Result<DeleteReport, CatalogError> {
        self.get_edition(id)?;
        self.remove_subtree(RecordKind::Edition, id.as_str())
    }

    // =========================================================================
    // STAGES
    // =========================================================================

    pub fn create_stage(
        &mut self,
        edition_id: &EditionId,
        draft: StageDraft,
    ) -> Result<Stage, CatalogError> {
        let draft = draft.normalized();
        draft.validate().into_result()?;
        self.get_edition(edition_id)?;

        let siblings = children_of::<Stage, S>(&self.store, edition_id.as_str())?;
        let now = Utc::now();
        let stage = Stage {
            id: StageId::generate(),
            edition_id: edition_id.clone(),
            name: draft.name,
            description: draft.description,
            rank: next_rank(siblings.iter().map(|s| s.rank)),
            active: draft.active,
            created_at: now,
            updated_at: now,
        };
        self.put_one(&stage)?;
        Ok(stage)
    }

    pub fn get_stage(&self, path: &StagePath) -> Result<Stage, CatalogError> {
        fetch::<Stage, S>(&self.store, path.stage_id.as_str())?
            .filter(|s| s.edition_id == path.edition_id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Stage, path.stage_id.as_str()))
    }

    /// Stages of an edition, by rank.
    pub fn list_stages(&self, edition_id: &EditionId) -> Result<Vec<Stage>, CatalogError> {
        self.get_edition(edition_id)?;
        let mut stages = children_of::<Stage, S>(&self.store, edition_id.as_str())?;
        sort_by_rank(&mut stages);
        Ok(stages)
    }

    pub fn update_stage(
        &mut self,
        path: &StagePath,
        patch: StagePatch,
    ) -> Result<Stage, CatalogError> {
        let mut stage = self.get_stage(path)?;
        let mut draft = StageDraft::from(&stage);
        patch.apply(&mut draft);
        let draft = draft.normalized();
        draft.validate().into_result()?;

        stage.name = draft.name;
        stage.description = draft.description;
        stage.active = draft.active;
        stage.touch(Utc::now());
        self.put_one(&stage)?;
        Ok(stage)
    }

    pub fn delete_stage(&mut self, path: &StagePath) -> Result<DeleteReport, CatalogError> {
        self.get_stage(path)?;
        self.remove_subtree(RecordKind::Stage, path.stage_id.as_str())
    }

    pub fn move_stage(
        &mut self,
        path: &StagePath,
        direction: Direction,
    ) -> Result<MoveOutcome<Stage>, CatalogError> {
        self.get_stage(path)?;
        let siblings = children_of::<Stage, S>(&self.store, path.edition_id.as_str())?;
        self.move_within(siblings, path.stage_id.as_str(), direction)
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    pub fn create_section(
        &mut self,
        path: &StagePath,
        draft: SectionDraft,
    ) -> Result<Section, CatalogError> {
        let draft = draft.normalized();
        draft.validate().into_result()?;
        self.get_stage(path)?;

        let siblings = children_of::<Section, S>(&self.store, path.stage_id.as_str())?;
        let rank = next_rank(siblings.iter().map(|s| s.rank));
        let section = new_section(path, draft, rank, Utc::now());
        self.put_one(&section)?;
        Ok(section)
    }

    /// Append the preset sections to a stage, ranked after the existing
    /// ones, in one batch.
    pub fn seed_preset_sections(&mut self, path: &StagePath) -> Result<Vec<Section>, CatalogError> {
        self.get_stage(path)?;

        let siblings = children_of::<Section, S>(&self.store, path.stage_id.as_str())?;
        let mut rank = next_rank(siblings.iter().map(|s| s.rank));
        let now = Utc::now();

        let mut batch = WriteBatch::new();
        let mut created = Vec::with_capacity(seeded_sections().len());
        for template in seeded_sections() {
            let draft = SectionDraft::new(template.name, template.icon, template.content_type);
            let section = new_section(path, draft, rank, now);
            batch.put(&section)?;
            created.push(section);
            rank = rank.saturating_add(1);
        }
        self.store.commit(batch)?;
        Ok(created)
    }

    pub fn get_section(&self, path: &SectionPath) -> Result<Section, CatalogError> {
        fetch::<Section, S>(&self.store, path.section_id.as_str())?
            .filter(|s| s.edition_id == path.edition_id && s.stage_id == path.stage_id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Section, path.section_id.as_str()))
    }

    /// Sections of a stage, by rank.
    pub fn list_sections(&self, path: &StagePath) -> Result<Vec<Section>, CatalogError> {
        self.get_stage(path)?;
        let mut sections = children_of::<Section, S>(&self.store, path.stage_id.as_str())?;
        sort_by_rank(&mut sections);
        Ok(sections)
    }

    pub fn update_section(
        &mut self,
        path: &SectionPath,
        patch: SectionPatch,
    ) -> Result<Section, CatalogError> {
        let mut section = self.get_section(path)?;
        let mut draft = SectionDraft::from(&section);
        patch.apply(&mut draft);
        let draft = draft.normalized();
        draft.validate().into_result()?;

        section.name = draft.name;
        section.icon = draft.icon;
        section.content_type = normalize_content_type(&draft.content_type);
        section.active = draft.active;
        section.touch(Utc::now());
        self.put_one(&section)?;
        Ok(section)
    }

    pub fn delete_section(&mut self, path: &SectionPath) -> Result<DeleteReport, CatalogError> {
        self.get_section(path)?;
        self.remove_subtree(RecordKind::Section, path.section_id.as_str())
    }

    pub fn move_section(
        &mut self,
        path: &SectionPath,
        direction: Direction,
    ) -> Result<MoveOutcome<Section>, CatalogError> {
        self.get_section(path)?;
        let siblings = children_of::<Section, S>(&self.store, path.stage_id.as_str())?;
        self.move_within(siblings, path.section_id.as_str(), direction)
    }

    // =========================================================================
    // REQUIREMENT ITEMS
    // =========================================================================

    pub fn create_item(
        &mut self,
        path: &SectionPath,
        draft: RequirementDraft,
    ) -> Result<RequirementItem, CatalogError> {
        let draft = draft.normalized();
        draft.validate().into_result()?;
        self.get_section(path)?;

        let subcategory = resolve_subcategory(&draft)?;
        let siblings = children_of::<RequirementItem, S>(&self.store, path.section_id.as_str())?;
        let now = Utc::now();
        let mut item = RequirementItem {
            id: ItemId::generate(),
            edition_id: path.edition_id.clone(),
            stage_id: path.stage_id.clone(),
            section_id: path.section_id.clone(),
            code: String::new(),
            title: String::new(),
            description: String::new(),
            category: draft.category,
            subcategory,
            document_type: String::new(),
            required_document: String::new(),
            specifications: Vec::new(),
            notes: String::new(),
            has_template: false,
            template_url: None,
            has_example_image: false,
            image_url: None,
            mandatory: true,
            active: true,
            rank: next_rank(siblings.iter().map(|s| s.rank)),
            created_at: now,
            updated_at: now,
        };
        fill_item(&mut item, draft)?;
        self.put_one(&item)?;
        Ok(item)
    }

    pub fn get_item(&self, path: &ItemPath) -> Result<RequirementItem, CatalogError> {
        fetch::<RequirementItem, S>(&self.store, path.item_id.as_str())?
            .filter(|i| {
                i.edition_id == path.edition_id
                    && i.stage_id == path.stage_id
                    && i.section_id == path.section_id
            })
            .ok_or_else(|| CatalogError::not_found(RecordKind::Item, path.item_id.as_str()))
    }

    /// Requirement items of a section, by rank.
    pub fn list_items(&self, path: &SectionPath) -> Result<Vec<RequirementItem>, CatalogError> {
        self.get_section(path)?;
        let mut items = children_of::<RequirementItem, S>(&self.store, path.section_id.as_str())?;
        sort_by_rank(&mut items);
        Ok(items)
    }

    pub fn update_item(
        &mut self,
        path: &ItemPath,
        patch: RequirementPatch,
    ) -> Result<RequirementItem, CatalogError> {
        let mut item = self.get_item(path)?;
        let mut draft = RequirementDraft::from(&item);
        patch.apply(&mut draft);
        let draft = draft.normalized();
        draft.validate().into_result()?;

        fill_item(&mut item, draft)?;
        item.touch(Utc::now());
        self.put_one(&item)?;
        Ok(item)
    }

    pub fn delete_item(&mut self, path: &ItemPath) -> Result<DeleteReport, CatalogError> {
        self.get_item(path)?;
        self.remove_subtree(RecordKind::Item, path.item_id.as_str())
    }

    pub fn move_item(
        &mut self,
        path: &ItemPath,
        direction: Direction,
    ) -> Result<MoveOutcome<RequirementItem>, CatalogError> {
        self.get_item(path)?;
        let siblings = children_of::<RequirementItem, S>(&self.store, path.section_id.as_str())?;
        self.move_within(siblings, path.item_id.as_str(), direction)
    }

    // =========================================================================
    // REPORTING
    // =========================================================================

    pub fn counts(&self) -> Result<CatalogCounts, CatalogError> {
        Ok(CatalogCounts {
            editions: self.store.count(RecordKind::Edition)?,
            stages: self.store.count(RecordKind::Stage)?,
            sections: self.store.count(RecordKind::Section)?,
            items: self.store.count(RecordKind::Item)?,
        })
    }

    /// Export every edition, in list order, as a CSV file dated `date`.
    pub fn export_editions_csv(&self, date: NaiveDate) -> Result<CsvExport, CatalogError> {
        export_editions(&self.list_editions()?, date)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Plan and commit a one-step move inside a freshly read sibling group.
    fn move_within<R>(
        &mut self,
        mut siblings: Vec<R>,
        key: &str,
        direction: Direction,
    ) -> Result<MoveOutcome<R>, CatalogError>
    where
        R: Record + Ranked,
    {
        let plan = plan_move(&siblings, key, direction)
            .ok_or_else(|| CatalogError::not_found(R::KIND, key))?;

        let swap = match plan {
            MovePlan::Unchanged(reason) => return Ok(MoveOutcome::Unchanged { reason }),
            MovePlan::Swap(swap) => swap,
        };

        apply_swap(&mut siblings, swap);
        let now = Utc::now();
        siblings[swap.moved].touch(now);
        siblings[swap.displaced].touch(now);

        let mut batch = WriteBatch::new();
        batch.put(&siblings[swap.moved])?;
        batch.put(&siblings[swap.displaced])?;
        self.store.commit(batch)?;

        Ok(MoveOutcome::Swapped {
            moved: siblings[swap.moved].clone(),
            displaced: siblings[swap.displaced].clone(),
        })
    }

    /// Keys of the direct children of `key`.
    fn child_keys(&self, kind: RecordKind, key: &str) -> Result<Vec<String>, CatalogError> {
        let keys = match kind.child() {
            Some(RecordKind::Stage) => children_of::<Stage, S>(&self.store, key)?
                .into_iter()
                .map(|r| r.id.0)
                .collect(),
            Some(RecordKind::Section) => children_of::<Section, S>(&self.store, key)?
                .into_iter()
                .map(|r| r.id.0)
                .collect(),
            Some(RecordKind::Item) => children_of::<RequirementItem, S>(&self.store, key)?
                .into_iter()
                .map(|r| r.id.0)
                .collect(),
            Some(RecordKind::Edition) | None => Vec::new(),
        };
        Ok(keys)
    }

    /// Delete `key` under the current policy.
    fn remove_subtree(&mut self, kind: RecordKind, key: &str) -> Result<DeleteReport, CatalogError> {
        let children = self.child_keys(kind, key)?;
        if !children.is_empty() && self.delete_policy == DeletePolicy::Reject {
            return Err(CatalogError::HasChildren {
                kind,
                count: children.len(),
            });
        }

        let mut batch = WriteBatch::new();
        batch.delete(kind, key);
        let mut pending: Vec<(RecordKind, String)> = kind
            .child()
            .map(|child| children.into_iter().map(|k| (child, k)).collect())
            .unwrap_or_default();

        while let Some((child_kind, child_key)) = pending.pop() {
            if let Some(grandchild) = child_kind.child() {
                for k in self.child_keys(child_kind, &child_key)? {
                    pending.push((grandchild, k));
                }
            }
            batch.delete(child_kind, child_key);
        }

        let report = DeleteReport {
            kind,
            id: key.to_string(),
            removed: batch.len(),
        };
        self.store.commit(batch)?;
        Ok(report)
    }
}

// =============================================================================
// TESTS
// =============================================================================
