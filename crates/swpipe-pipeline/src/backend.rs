//! Capability set every backend provides
//!
//! The pipeline is generic over [`Backend`]; the variant is chosen once at
//! startup (see `select`) and nothing downstream inspects the mode again.

use std::path::PathBuf;

use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwResult};
use swpipe_crypto::{DataKey, EnvelopeMeta};

/// Result of adding the user to the on-chain allowlist
#[derive(Debug, Clone)]
pub struct AllowlistReceipt {
    /// `0x`-prefixed transaction digest
    pub tx_hash: String,
    pub allowlist_id: String,
}

/// An envelope written to disk by [`Backend::encrypt`]
#[derive(Debug, Clone)]
pub struct EncryptedArtifact {
    pub document_id: DocumentId,
    pub path: PathBuf,
    pub meta: EnvelopeMeta,
    pub plaintext_len: u64,
    pub envelope_len: u64,
}

/// Opaque session token issued by the key service
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionKey").field(&"[REDACTED]").finish()
    }
}

/// Decryption key material released for one document
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub document_id: DocumentId,
    pub key: DataKey,
}

/// The allowlist, key-management and storage capabilities the pipeline uses.
///
/// All calls run strictly one after another; none is expected to be
/// re-entrant.
#[allow(async_fn_in_trait)]
pub trait Backend {
    fn mode(&self) -> Mode;

    /// Confirm the backend can run at all (storage reachable, settings present).
    async fn preflight(&self) -> SwResult<()>;

    async fn add_allowlist_entry(&self, allowlist_id: &str) -> SwResult<AllowlistReceipt>;

    /// Encrypt `plaintext`, bound to `document_id`, and write the envelope
    /// to disk.
    async fn encrypt(
        &mut self,
        plaintext: &[u8],
        document_id: &DocumentId,
    ) -> SwResult<EncryptedArtifact>;

    async fn upload(
        &self,
        envelope: &[u8],
        meta: &EnvelopeMeta,
        keyspace: &Keyspace,
    ) -> SwResult<BlobId>;

    async fn download(&self, blob_id: &BlobId, keyspace: &Keyspace) -> SwResult<Vec<u8>>;

    async fn create_session_key(&self) -> SwResult<SessionKey>;

    /// Release the key for `document_id`. Never fabricates a key for a
    /// document this backend did not encrypt.
    async fn fetch_decryption_keys(
        &self,
        session: &SessionKey,
        document_id: &DocumentId,
    ) -> SwResult<KeyMaterial>;

    async fn decrypt(
        &self,
        envelope: &[u8],
        key: &KeyMaterial,
        meta: &EnvelopeMeta,
    ) -> SwResult<Vec<u8>>;
}
