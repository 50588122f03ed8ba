//! # redb-backed Record Storage
//!
//! A disk-backed record store using the redb embedded database, providing:
//! - ACID transactions (one write transaction per [`WriteBatch`])
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Each record kind has its own table mapping the record id to its
//! postcard bytes.

use super::{ContentStore, WriteBatch, WriteOp};
use crate::types::{CatalogError, RecordKind};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for editions: id -> serialized Edition bytes
const EDITIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("editions");

/// Table for stages: id -> serialized Stage bytes
const STAGES: TableDefinition<&str, &[u8]> = TableDefinition::new("stages");

/// Table for sections: id -> serialized Section bytes
const SECTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sections");

/// Table for requirement items: id -> serialized RequirementItem bytes
const ITEMS: TableDefinition<&str, &[u8]> = TableDefinition::new("requirement_items");

fn table_for(kind: RecordKind) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match kind {
        RecordKind::Edition => EDITIONS,
        RecordKind::Stage => STAGES,
        RecordKind::Section => SECTIONS,
        RecordKind::Item => ITEMS,
    }
}

fn storage_err(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Storage(e.to_string())
}

/// A disk-backed record store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a record database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;

        // Initialize tables if they don't exist, so read transactions never
        // hit a missing table.
        {
            let write_txn = db.begin_write().map_err(storage_err)?;
            let _ = write_txn.open_table(EDITIONS).map_err(storage_err)?;
            let _ = write_txn.open_table(STAGES).map_err(storage_err)?;
            let _ = write_txn.open_table(SECTIONS).map_err(storage_err)?;
            let _ = write_txn.open_table(ITEMS).map_err(storage_err)?;
            write_txn.commit().map_err(storage_err)?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), CatalogError> {
        self.db.compact().map_err(storage_err)?;
        Ok(())
    }
}

impl ContentStore for RedbStore {
    fn load(&self, kind: RecordKind, key: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(table_for(kind)).map_err(storage_err)?;
        let bytes = table
            .get(key)
            .map_err(storage_err)?
            .map(|data| data.value().to_vec());
        Ok(bytes)
    }

    fn scan(&self, kind: RecordKind) -> Result<Vec<Vec<u8>>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(table_for(kind)).map_err(storage_err)?;

        let mut records = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (_key, value) = entry.map_err(storage_err)?;
            records.push(value.value().to_vec());
        }
        Ok(records)
    }

    /// Apply the whole batch inside one write transaction.
    ///
    /// Any error returns before `commit`, and dropping the uncommitted
    /// transaction aborts it.
    fn commit(&mut self, batch: WriteBatch) -> Result<(), CatalogError> {
        if batch.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut editions = write_txn.open_table(EDITIONS).map_err(storage_err)?;
            let mut stages = write_txn.open_table(STAGES).map_err(storage_err)?;
            let mut sections = write_txn.open_table(SECTIONS).map_err(storage_err)?;
            let mut items = write_txn.open_table(ITEMS).map_err(storage_err)?;

            for op in batch.into_ops() {
                let table = match op.kind() {
                    RecordKind::Edition => &mut editions,
                    RecordKind::Stage => &mut stages,
                    RecordKind::Section => &mut sections,
                    RecordKind::Item => &mut items,
                };
                match op {
                    WriteOp::Put { key, bytes, .. } => {
                        table
                            .insert(key.as_str(), bytes.as_slice())
                            .map_err(storage_err)?;
                    }
                    WriteOp::Delete { key, .. } => {
                        table.remove(key.as_str()).map_err(storage_err)?;
                    }
                }
            }
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    fn count(&self, kind: RecordKind) -> Result<usize, CatalogError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(table_for(kind)).map_err(storage_err)?;
        let len = table.len().map_err(storage_err)?;
        Ok(usize::try_from(len).unwrap_or(usize::MAX))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn put(batch: &mut WriteBatch, kind: RecordKind, key: &str, bytes: &[u8]) {
        batch.ops.push(WriteOp::Put {
            kind,
            key: key.to_string(),
            bytes: bytes.to_vec(),
        });
    }

    #[test]
    fn basic_operations() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");
        let mut store = RedbStore::open(&db_path).expect("open db");

        let mut batch = WriteBatch::new();
        put(&mut batch, RecordKind::Edition, "e1", b"edition");
        put(&mut batch, RecordKind::Stage, "s1", b"stage");
        store.commit(batch).expect("commit");

        assert_eq!(
            store.load(RecordKind::Edition, "e1").expect("load"),
            Some(b"edition".to_vec())
        );
        assert_eq!(store.load(RecordKind::Section, "s1").expect("load"), None);
        assert_eq!(store.count(RecordKind::Stage).expect("count"), 1);
    }

    #[test]
    fn delete_removes_record() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");
        let mut store = RedbStore::open(&db_path).expect("open db");

        let mut batch = WriteBatch::new();
        put(&mut batch, RecordKind::Item, "i1", b"a");
        put(&mut batch, RecordKind::Item, "i2", b"b");
        store.commit(batch).expect("commit");

        let mut batch = WriteBatch::new();
        batch.delete(RecordKind::Item, "i1");
        batch.delete(RecordKind::Item, "missing");
        store.commit(batch).expect("commit");

        assert_eq!(store.scan(RecordKind::Item).expect("scan"), vec![b"b".to_vec()]);
    }

    #[test]
    fn recovery_persistence_after_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        // Phase 1: Write and drop
        {
            let mut store = RedbStore::open(&db_path).expect("open db");
            let mut batch = WriteBatch::new();
            for i in 0..20 {
                put(&mut batch, RecordKind::Section, &format!("k{:02}", i), &[i]);
            }
            store.commit(batch).expect("commit");
        }

        // Phase 2: Verify after reopen
        {
            let store = RedbStore::open(&db_path).expect("reopen db");
            assert_eq!(store.count(RecordKind::Section).expect("count"), 20);
            assert_eq!(
                store.load(RecordKind::Section, "k07").expect("load"),
                Some(vec![7])
            );
        }
    }

    #[test]
    fn recovery_compact_and_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        {
            let mut store = RedbStore::open(&db_path).expect("open db");
            let mut batch = WriteBatch::new();
            for i in 0..50u8 {
                put(&mut batch, RecordKind::Edition, &format!("e{}", i), &[i]);
            }
            store.commit(batch).expect("commit");
            store.compact().expect("compact");
        }

        let store = RedbStore::open(&db_path).expect("reopen db");
        assert_eq!(store.count(RecordKind::Edition).expect("count"), 50);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        store.commit(WriteBatch::new()).expect("commit");
        assert_eq!(store.count(RecordKind::Edition).expect("count"), 0);
    }
}
