//! In-memory DocumentId → key map
//!
//! Scoped to one backend instance; nothing is persisted. Re-encrypting a
//! document replaces its key (last writer wins).

use std::collections::HashMap;

use swpipe_core::{DocumentId, SwError, SwResult};
use swpipe_crypto::DataKey;

#[derive(Debug, Default)]
pub struct KeyStore {
    keys: HashMap<DocumentId, DataKey>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the key for a document, returning the key it replaced.
    pub fn insert(&mut self, document_id: DocumentId, key: DataKey) -> Option<DataKey> {
        self.keys.insert(document_id, key)
    }

    pub fn get(&self, document_id: &DocumentId) -> SwResult<DataKey> {
        self.keys
            .get(document_id)
            .cloned()
            .ok_or_else(|| SwError::Key(format!("no key held for document {document_id}")))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
