//! Local simulation of the allowlist, SEAL and Walrus
//!
//! - allowlist add: logged, returns a random transaction digest
//! - encrypt/decrypt: AES-256-GCM envelopes, keys kept in a [`KeyStore`]
//! - upload/download: content-addressed [`BlobStore`] under `{out}/walrus`

use rand::RngCore;
use std::path::Path;
use tracing::{debug, info, warn};

use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwError, SwResult};
use swpipe_crypto::{decrypt_envelope, encrypt_envelope, generate_data_key, EnvelopeMeta};
use swpipe_storage::BlobStore;

use crate::backend::{AllowlistReceipt, Backend, EncryptedArtifact, KeyMaterial, SessionKey};
use crate::keystore::KeyStore;
use crate::layout::OutputLayout;

/// Attach the path to an I/O error so the failing file shows up in logs.
pub(crate) fn io_err(action: &str, path: &Path, e: std::io::Error) -> SwError {
    SwError::Io(std::io::Error::new(
        e.kind(),
        format!("{action} {}: {e}", path.display()),
    ))
}

pub(crate) async fn write_file(path: &Path, data: &[u8]) -> SwResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_err("creating", parent, e))?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| io_err("writing", path, e))
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct MockBackend {
    layout: OutputLayout,
    store: BlobStore,
    keys: KeyStore,
}

impl MockBackend {
    pub fn new(layout: OutputLayout, store: BlobStore) -> Self {
        Self {
            layout,
            store,
            keys: KeyStore::new(),
        }
    }

    /// Mock backend with its blob store on the local filesystem under
    /// `{output_dir}/walrus`.
    pub fn local(layout: OutputLayout) -> SwResult<Self> {
        let op = swpipe_storage::build_local_operator(&layout.walrus_root())?;
        Ok(Self::new(layout, BlobStore::new(op)))
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }
}

impl Backend for MockBackend {
    fn mode(&self) -> Mode {
        Mode::Mock
    }

    async fn preflight(&self) -> SwResult<()> {
        swpipe_storage::check_health(self.store.operator()).await
    }

    async fn add_allowlist_entry(&self, allowlist_id: &str) -> SwResult<AllowlistReceipt> {
        let receipt = AllowlistReceipt {
            tx_hash: format!("0x{}", random_hex(32)),
            allowlist_id: allowlist_id.to_string(),
        };
        info!(
            allowlist_id,
            tx_hash = %receipt.tx_hash,
            "(mock) added user to allowlist, admin sponsored gas"
        );
        Ok(receipt)
    }

    async fn encrypt(
        &mut self,
        plaintext: &[u8],
        document_id: &DocumentId,
    ) -> SwResult<EncryptedArtifact> {
        let key = generate_data_key();
        let envelope = encrypt_envelope(&key, plaintext)?;
        let meta = EnvelopeMeta::from_envelope(&envelope)?;

        let path = self.layout.encrypted_path(document_id);
        write_file(&path, &envelope).await?;

        if self.keys.insert(document_id.clone(), key).is_some() {
            warn!(%document_id, "replaced existing key for document");
        }

        debug!(
            %document_id,
            path = %path.display(),
            plaintext_len = plaintext.len(),
            envelope_len = envelope.len(),
            "envelope written"
        );

        Ok(EncryptedArtifact {
            document_id: document_id.clone(),
            path,
            meta,
            plaintext_len: plaintext.len() as u64,
            envelope_len: envelope.len() as u64,
        })
    }

    async fn upload(
        &self,
        envelope: &[u8],
        meta: &EnvelopeMeta,
        keyspace: &Keyspace,
    ) -> SwResult<BlobId> {
        let blob_id = self.store.put(keyspace, envelope).await?;
        debug!(%blob_id, %keyspace, algorithm = %meta.algorithm, "(mock) uploaded to walrus");
        Ok(blob_id)
    }

    async fn download(&self, blob_id: &BlobId, keyspace: &Keyspace) -> SwResult<Vec<u8>> {
        self.store.get(keyspace, blob_id).await
    }

    async fn create_session_key(&self) -> SwResult<SessionKey> {
        Ok(SessionKey::new(random_hex(16)))
    }

    async fn fetch_decryption_keys(
        &self,
        _session: &SessionKey,
        document_id: &DocumentId,
    ) -> SwResult<KeyMaterial> {
        let key = self.keys.get(document_id)?;
        Ok(KeyMaterial {
            document_id: document_id.clone(),
            key,
        })
    }

    async fn decrypt(
        &self,
        envelope: &[u8],
        key: &KeyMaterial,
        meta: &EnvelopeMeta,
    ) -> SwResult<Vec<u8>> {
        meta.check(envelope)?;
        decrypt_envelope(&key.key, envelope)
    }
}
