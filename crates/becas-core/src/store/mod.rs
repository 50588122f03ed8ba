//! # Content Storage
//!
//! The catalog persists records through the [`ContentStore`] trait. A store
//! only knows record kinds, string keys and opaque bytes; typing happens in
//! this module through the [`Record`] trait.
//!
//! Records are encoded with `postcard`. All writes go through a
//! [`WriteBatch`], which a store applies atomically: either every operation
//! in the batch lands or none does.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: `BTreeMap` tables, volatile.
//! - [`RedbStore`]: redb file, ACID, one write transaction per batch.
//!
//! [`StorageBackend`] dispatches between the two at runtime.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::types::{CatalogError, Edition, RecordKind, RequirementItem, Section, Stage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A typed record that can live in a [`ContentStore`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Table the record lives in.
    const KIND: RecordKind;

    /// Store key (the record id).
    fn key(&self) -> &str;

    /// Key of the immediate parent; `None` for top-level records.
    fn parent_key(&self) -> Option<&str>;

    /// Stamp the update time.
    fn touch(&mut self, now: DateTime<Utc>);
}

impl Record for Edition {
    const KIND: RecordKind = RecordKind::Edition;

    fn key(&self) -> &str {
        self.id.as_str()
    }
    fn parent_key(&self) -> Option<&str> {
        None
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Record for Stage {
    const KIND: RecordKind = RecordKind::Stage;

    fn key(&self) -> &str {
        self.id.as_str()
    }
    fn parent_key(&self) -> Option<&str> {
        Some(self.edition_id.as_str())
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Record for Section {
    const KIND: RecordKind = RecordKind::Section;

    fn key(&self) -> &str {
        self.id.as_str()
    }
    fn parent_key(&self) -> Option<&str> {
        Some(self.stage_id.as_str())
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Record for RequirementItem {
    const KIND: RecordKind = RecordKind::Item;

    fn key(&self) -> &str {
        self.id.as_str()
    }
    fn parent_key(&self) -> Option<&str> {
        Some(self.section_id.as_str())
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Encode a record for storage.
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>, CatalogError> {
    postcard::to_allocvec(record).map_err(|e| CatalogError::Serialization(e.to_string()))
}

/// Decode a stored record.
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R, CatalogError> {
    postcard::from_bytes(bytes).map_err(|e| CatalogError::Serialization(e.to_string()))
}

// =============================================================================
// WRITE BATCH
// =============================================================================

/// A single write inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put {
        kind: RecordKind,
        key: String,
        bytes: Vec<u8>,
    },
    Delete {
        kind: RecordKind,
        key: String,
    },
}

impl WriteOp {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Put { kind, .. } | Self::Delete { kind, .. } => *kind,
        }
    }
}

/// An ordered group of writes applied atomically by [`ContentStore::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an insert-or-replace of `record`.
    pub fn put<R: Record>(&mut self, record: &R) -> Result<(), CatalogError> {
        self.ops.push(WriteOp::Put {
            kind: R::KIND,
            key: record.key().to_string(),
            bytes: encode(record)?,
        });
        Ok(())
    }

    /// Queue a removal. Removing a missing key is not an error.
    pub fn delete(&mut self, kind: RecordKind, key: impl Into<String>) {
        self.ops.push(WriteOp::Delete {
            kind,
            key: key.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Byte-level record storage, one table per [`RecordKind`].
pub trait ContentStore {
    /// Raw bytes stored under `key`, if present.
    fn load(&self, kind: RecordKind, key: &str) -> Result<Option<Vec<u8>>, CatalogError>;

    /// Raw bytes of every record of `kind`, in key order.
    fn scan(&self, kind: RecordKind) -> Result<Vec<Vec<u8>>, CatalogError>;

    /// Apply every operation in `batch`, or none of them.
    fn commit(&mut self, batch: WriteBatch) -> Result<(), CatalogError>;

    /// Number of records of `kind`.
    fn count(&self, kind: RecordKind) -> Result<usize, CatalogError> {
        Ok(self.scan(kind)?.len())
    }
}

/// Load and decode one record.
pub fn fetch<R: Record, S: ContentStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<R>, CatalogError> {
    store
        .load(R::KIND, key)?
        .map(|bytes| decode(&bytes))
        .transpose()
}

/// Load and decode every record of a kind.
pub fn fetch_all<R: Record, S: ContentStore + ?Sized>(store: &S) -> Result<Vec<R>, CatalogError> {
    store.scan(R::KIND)?.iter().map(|b| decode(b)).collect()
}

/// Load and decode the records whose immediate parent is `parent`.
pub fn children_of<R: Record, S: ContentStore + ?Sized>(
    store: &S,
    parent: &str,
) -> Result<Vec<R>, CatalogError> {
    Ok(fetch_all::<R, S>(store)?
        .into_iter()
        .filter(|r| r.parent_key() == Some(parent))
        .collect())
}

// =============================================================================
// BACKEND DISPATCH
// =============================================================================

/// Storage backend selected at startup.
#[derive(Debug)]
pub enum StorageBackend {
    /// Volatile `BTreeMap` tables.
    InMemory(MemoryStore),
    /// Disk-backed redb database.
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl StorageBackend {
    /// Open (or create) a redb database at `path`.
    pub fn redb(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Ok(Self::Persistent(RedbStore::open(path)?))
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }
}

impl ContentStore for StorageBackend {
    fn load(&self, kind: RecordKind, key: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        match self {
            Self::InMemory(s) => s.load(kind, key),
            Self::Persistent(s) => s.load(kind, key),
        }
    }

    fn scan(&self, kind: RecordKind) -> Result<Vec<Vec<u8>>, CatalogError> {
        match self {
            Self::InMemory(s) => s.scan(kind),
            Self::Persistent(s) => s.scan(kind),
        }
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), CatalogError> {
        match self {
            Self::InMemory(s) => s.commit(batch),
            Self::Persistent(s) => s.commit(batch),
        }
    }

    fn count(&self, kind: RecordKind) -> Result<usize, CatalogError> {
        match self {
            Self::InMemory(s) => s.count(kind),
            Self::Persistent(s) => s.count(kind),
        }
    }
}
