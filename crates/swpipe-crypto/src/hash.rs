//! SHA-256 content hashing and identifier derivation
//!
//! The same digest names two things: a document (hash of its allowlist id)
//! and a blob (hash of its stored bytes).

use sha2::{Digest, Sha256};
use swpipe_core::{BlobId, DocumentId};

fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Lowercase hex SHA-256 of `input` (64 chars).
pub fn sha256_hex(input: impl AsRef<[u8]>) -> String {
    hex::encode(sha256(input.as_ref()))
}

/// DocumentId for an allowlist identifier.
///
/// The identifier is lower-cased before hashing, so `0xABC` and `0xabc`
/// name the same document.
pub fn document_id_for_allowlist(allowlist_id: &str) -> DocumentId {
    DocumentId::from_digest(sha256(allowlist_id.to_lowercase().as_bytes()))
}

/// DocumentId in the older admin-address + timestamp form.
///
/// Hashes `address` followed by the decimal millisecond timestamp, with no
/// separator. Not stable across runs; kept for reading older artifacts.
pub fn legacy_document_id(admin_address: &str, unix_millis: u128) -> DocumentId {
    let mut hasher = Sha256::new();
    hasher.update(admin_address.as_bytes());
    hasher.update(unix_millis.to_string().as_bytes());
    DocumentId::from_digest(hasher.finalize().into())
}

/// Content address of `content`.
pub fn blob_id_for(content: &[u8]) -> BlobId {
    BlobId::from_digest(sha256(content))
}
