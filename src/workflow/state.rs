//! Ledger state access
//!
//! World state is a key-value store of JSON documents keyed by composite
//! keys. The trait keeps the workflow engine independent of the backing
//! store; the in-memory implementation backs the gateway and the tests.

use std::collections::BTreeMap;

use super::assets::DocType;

/// Composite key for an asset record
///
/// Mirrors the ledger's composite-key layout: the document type and the id,
/// separated by a NUL so ids cannot collide across document types.
pub fn composite_key(doc_type: DocType, id: &str) -> String {
    format!("{}\u{0}{}", doc_type.as_str(), id)
}

/// Scan prefix selecting every record of one document type
pub fn doc_type_prefix(doc_type: DocType) -> String {
    format!("{}\u{0}", doc_type.as_str())
}

/// World state store
pub trait StateStore: Send + Sync {
    /// Fetch a record, `None` when the key has never been written
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Write a record, overwriting any previous value
    fn put(&mut self, key: &str, value: Vec<u8>);

    /// All records whose key starts with `prefix`, in key order
    fn scan(&self, prefix: &str) -> Vec<(String, Vec<u8>)>;
}

/// In-memory world state
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    fn scan(&self, prefix: &str) -> Vec<(String, Vec<u8>)> {
        self.entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
