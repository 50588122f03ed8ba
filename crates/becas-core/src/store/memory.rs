//! In-memory record tables.

use super::{ContentStore, WriteBatch, WriteOp};
use crate::types::{CatalogError, RecordKind};
use std::collections::BTreeMap;

/// Volatile store keeping one ordered map per record kind.
///
/// A batch is applied to a staged copy of the touched tables and swapped in
/// at the end, so the store never exposes a half-applied batch.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<RecordKind, BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryStore {
    fn load(&self, kind: RecordKind, key: &str) -> Result<Option<Vec<u8>>, CatalogError> {
        Ok(self
            .tables
            .get(&kind)
            .and_then(|table| table.get(key))
            .cloned())
    }

    fn scan(&self, kind: RecordKind) -> Result<Vec<Vec<u8>>, CatalogError> {
        Ok(self
            .tables
            .get(&kind)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), CatalogError> {
        let mut staged: BTreeMap<RecordKind, BTreeMap<String, Vec<u8>>> = BTreeMap::new();

        for op in batch.into_ops() {
            let kind = op.kind();
            let table = staged
                .entry(kind)
                .or_insert_with(|| self.tables.get(&kind).cloned().unwrap_or_default());
            match op {
                WriteOp::Put { key, bytes, .. } => {
                    table.insert(key, bytes);
                }
                WriteOp::Delete { key, .. } => {
                    table.remove(&key);
                }
            }
        }

        self.tables.extend(staged);
        Ok(())
    }

    fn count(&self, kind: RecordKind) -> Result<usize, CatalogError> {
        Ok(self.tables.get(&kind).map_or(0, BTreeMap::len))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn put(batch: &mut WriteBatch, kind: RecordKind, key: &str, bytes: &[u8]) {
        batch.ops.push(WriteOp::Put {
            kind,
            key: key.to_string(),
            bytes: bytes.to_vec(),
        });
    }

    #[test]
    fn put_then_load() {
        let mut store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        put(&mut batch, RecordKind::Edition, "e1", b"one");
        store.commit(batch).expect("commit");

        assert_eq!(
            store.load(RecordKind::Edition, "e1").expect("load"),
            Some(b"one".to_vec())
        );
        assert_eq!(store.load(RecordKind::Stage, "e1").expect("load"), None);
    }

    #[test]
    fn scan_is_key_ordered() {
        let mut store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        put(&mut batch, RecordKind::Stage, "b", b"2");
        put(&mut batch, RecordKind::Stage, "a", b"1");
        store.commit(batch).expect("commit");

        let values = store.scan(RecordKind::Stage).expect("scan");
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec()]);
        assert_eq!(store.count(RecordKind::Stage).expect("count"), 2);
    }

    #[test]
    fn later_ops_in_a_batch_win() {
        let mut store = MemoryStore::new();
        let mut batch = WriteBatch::new();
        put(&mut batch, RecordKind::Item, "i", b"old");
        batch.delete(RecordKind::Item, "i");
        put(&mut batch, RecordKind::Item, "j", b"new");
        store.commit(batch).expect("commit");

        assert_eq!(store.load(RecordKind::Item, "i").expect("load"), None);
        assert_eq!(store.count(RecordKind::Item).expect("count"), 1);
    }
}
