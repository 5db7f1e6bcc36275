//! Output directory layout

use std::path::{Path, PathBuf};
use swpipe_core::DocumentId;

/// Paths under the pipeline output root:
///
/// ```text
/// {root}/encrypted/{document_id}.bin
/// {root}/walrus/{keyspace}/{blob_id}.bin
/// {root}/decrypted/{document_id}.decrypted
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn encrypted_path(&self, document_id: &DocumentId) -> PathBuf {
        self.root
            .join("encrypted")
            .join(format!("{document_id}.bin"))
    }

    pub fn decrypted_path(&self, document_id: &DocumentId) -> PathBuf {
        self.root
            .join("decrypted")
            .join(format!("{document_id}.decrypted"))
    }

    pub fn walrus_root(&self) -> PathBuf {
        swpipe_storage::walrus_root(&self.root)
    }
}
