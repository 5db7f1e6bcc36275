//! Real-network backend: Sui allowlist, SEAL key servers, Walrus node
//!
//! None of the three integrations is wired up yet. Each capability checks
//! the settings it would need (so misconfiguration is reported first) and then
//! returns `SwError::NotImplemented` naming the missing integration.

use secrecy::SecretString;
use tracing::info;

use swpipe_core::config::SwConfig;
use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwError, SwResult};
use swpipe_crypto::EnvelopeMeta;

use crate::backend::{AllowlistReceipt, Backend, EncryptedArtifact, KeyMaterial, SessionKey};

/// Settings for the real integrations. Private keys come only from the
/// environment and are held as secrets.
#[derive(Debug, Default)]
pub struct RealSettings {
    pub sui_rpc_url: Option<String>,
    pub allowlist_package: Option<String>,
    pub walrus_node_url: Option<String>,
    pub admin_private_key: Option<SecretString>,
    pub user_private_key: Option<SecretString>,
}

impl RealSettings {
    /// Collect settings from config, reading private keys through `lookup`
    /// (`ADMIN_PRIVATE_KEY`, `USER_PRIVATE_KEY`).
    pub fn from_config<F>(config: &SwConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            sui_rpc_url: config.sui.rpc_url.clone(),
            allowlist_package: config.sui.allowlist_package.clone(),
            walrus_node_url: config.walrus.node_url.clone(),
            admin_private_key: lookup("ADMIN_PRIVATE_KEY").map(SecretString::from),
            user_private_key: lookup("USER_PRIVATE_KEY").map(SecretString::from),
        }
    }
}

#[derive(Debug)]
pub struct RealBackend {
    settings: RealSettings,
}

impl RealBackend {
    pub fn new(settings: RealSettings) -> Self {
        Self { settings }
    }

    fn require_sui(&self) -> SwResult<&str> {
        match (
            self.settings.sui_rpc_url.as_deref(),
            &self.settings.admin_private_key,
            &self.settings.user_private_key,
        ) {
            (Some(url), Some(_), Some(_)) => Ok(url),
            _ => Err(SwError::Configuration(
                "SUI_RPC_URL / ADMIN_PRIVATE_KEY / USER_PRIVATE_KEY must be set for real mode"
                    .into(),
            )),
        }
    }

    fn require_walrus(&self) -> SwResult<&str> {
        self.settings.walrus_node_url.as_deref().ok_or_else(|| {
            SwError::Configuration("WALRUS_NODE_URL must be set for real mode".into())
        })
    }
}

impl Backend for RealBackend {
    fn mode(&self) -> Mode {
        Mode::Real
    }

    async fn preflight(&self) -> SwResult<()> {
        self.require_sui()?;
        self.require_walrus()?;
        Ok(())
    }

    async fn add_allowlist_entry(&self, allowlist_id: &str) -> SwResult<AllowlistReceipt> {
        let rpc_url = self.require_sui()?;
        let package = self
            .settings
            .allowlist_package
            .as_deref()
            .unwrap_or("(unset)");
        info!(allowlist_id, rpc_url, package, "(real) adding user to allowlist");
        Err(SwError::NotImplemented(
            "Sui allowlist add (admin-sponsored transaction)".into(),
        ))
    }

    async fn encrypt(
        &mut self,
        _plaintext: &[u8],
        _document_id: &DocumentId,
    ) -> SwResult<EncryptedArtifact> {
        Err(SwError::NotImplemented("SEAL encryption".into()))
    }

    async fn upload(
        &self,
        _envelope: &[u8],
        _meta: &EnvelopeMeta,
        _keyspace: &Keyspace,
    ) -> SwResult<BlobId> {
        self.require_walrus()?;
        Err(SwError::NotImplemented("Walrus blob upload".into()))
    }

    async fn download(&self, _blob_id: &BlobId, _keyspace: &Keyspace) -> SwResult<Vec<u8>> {
        self.require_walrus()?;
        Err(SwError::NotImplemented("Walrus blob download".into()))
    }

    async fn create_session_key(&self) -> SwResult<SessionKey> {
        Err(SwError::NotImplemented("SEAL session key".into()))
    }

    async fn fetch_decryption_keys(
        &self,
        _session: &SessionKey,
        _document_id: &DocumentId,
    ) -> SwResult<KeyMaterial> {
        Err(SwError::NotImplemented("SEAL key server fetch".into()))
    }

    async fn decrypt(
        &self,
        _envelope: &[u8],
        _key: &KeyMaterial,
        _meta: &EnvelopeMeta,
    ) -> SwResult<Vec<u8>> {
        Err(SwError::NotImplemented("SEAL decryption".into()))
    }
}
