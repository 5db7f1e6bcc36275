//! Backend selection, done once at startup

use swpipe_core::config::SwConfig;
use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwResult};
use swpipe_crypto::EnvelopeMeta;

use crate::backend::{AllowlistReceipt, Backend, EncryptedArtifact, KeyMaterial, SessionKey};
use crate::layout::OutputLayout;
use crate::mock::MockBackend;
use crate::real::{RealBackend, RealSettings};

/// The backend chosen from configuration
pub enum SelectedBackend {
    Mock(MockBackend),
    Real(RealBackend),
}

/// Build the backend for `config.pipeline.mode`.
///
/// `lookup` supplies secrets that never live in the config file.
pub fn select_backend<F>(config: &SwConfig, lookup: F) -> SwResult<SelectedBackend>
where
    F: Fn(&str) -> Option<String>,
{
    match config.pipeline.mode {
        Mode::Mock => {
            let layout = OutputLayout::new(&config.pipeline.output_dir);
            Ok(SelectedBackend::Mock(MockBackend::local(layout)?))
        }
        Mode::Real => Ok(SelectedBackend::Real(RealBackend::new(
            RealSettings::from_config(config, lookup),
        ))),
    }
}

macro_rules! dispatch {
    ($self:ident, $b:ident => $call:expr) => {
        match $self {
            SelectedBackend::Mock($b) => $call,
            SelectedBackend::Real($b) => $call,
        }
    };
}

impl Backend for SelectedBackend {
    fn mode(&self) -> Mode {
        dispatch!(self, b => b.mode())
    }

    async fn preflight(&self) -> SwResult<()> {
        dispatch!(self, b => b.preflight().await)
    }

    async fn add_allowlist_entry(&self, allowlist_id: &str) -> SwResult<AllowlistReceipt> {
        dispatch!(self, b => b.add_allowlist_entry(allowlist_id).await)
    }

    async fn encrypt(
        &mut self,
        plaintext: &[u8],
        document_id: &DocumentId,
    ) -> SwResult<EncryptedArtifact> {
        dispatch!(self, b => b.encrypt(plaintext, document_id).await)
    }

    async fn upload(
        &self,
        envelope: &[u8],
        meta: &EnvelopeMeta,
        keyspace: &Keyspace,
    ) -> SwResult<BlobId> {
        dispatch!(self, b => b.upload(envelope, meta, keyspace).await)
    }

    async fn download(&self, blob_id: &BlobId, keyspace: &Keyspace) -> SwResult<Vec<u8>> {
        dispatch!(self, b => b.download(blob_id, keyspace).await)
    }

    async fn create_session_key(&self) -> SwResult<SessionKey> {
        dispatch!(self, b => b.create_session_key().await)
    }

    async fn fetch_decryption_keys(
        &self,
        session: &SessionKey,
        document_id: &DocumentId,
    ) -> SwResult<KeyMaterial> {
        dispatch!(self, b => b.fetch_decryption_keys(session, document_id).await)
    }

    async fn decrypt(
        &self,
        envelope: &[u8],
        key: &KeyMaterial,
        meta: &EnvelopeMeta,
    ) -> SwResult<Vec<u8>> {
        dispatch!(self, b => b.decrypt(envelope, key, meta).await)
    }
}
