use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{SwError, SwResult};
use crate::types::{Keyspace, Mode};

/// Top-level configuration (loaded from swpipe.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwConfig {
    pub pipeline: PipelineConfig,
    pub walrus: WalrusConfig,
    pub sui: SuiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Backend mode: "mock" or "real" (default: mock)
    pub mode: Mode,
    /// Output root for encrypted/, walrus/ and decrypted/ (default: ./out)
    pub output_dir: PathBuf,
    /// Blob store keyspace (default: "default")
    pub keyspace: Keyspace,
    /// Allowlist identifier the DocumentId is derived from
    pub allowlist_id: Option<String>,
    /// Remove envelope and decrypted output after the run
    pub cleanup: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalrusConfig {
    /// Walrus node endpoint (real mode only)
    pub node_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiConfig {
    /// Sui fullnode RPC endpoint (real mode only)
    pub rpc_url: Option<String>,
    /// Allowlist package the admin calls into
    pub allowlist_package: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Mock,
            output_dir: PathBuf::from("./out"),
            keyspace: Keyspace::default(),
            allowlist_id: None,
            cleanup: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl SwConfig {
    /// Overlay environment variables onto the file config.
    ///
    /// `lookup` is `std::env::var(..).ok()` in the binary; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> SwResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("MODE") {
            self.pipeline.mode = mode.parse()?;
        }
        if let Some(dir) = lookup("OUTPUT_DIR") {
            self.pipeline.output_dir = PathBuf::from(dir);
        }
        if let Some(id) = lookup("ALLOWLIST_ID") {
            self.pipeline.allowlist_id = Some(id);
        }
        if let Some(url) = lookup("WALRUS_NODE_URL") {
            self.walrus.node_url = Some(url);
        }
        if let Some(url) = lookup("SUI_RPC_URL") {
            self.sui.rpc_url = Some(url);
        }
        if let Some(pkg) = lookup("ALLOWLIST_PACKAGE") {
            self.sui.allowlist_package = Some(pkg);
        }
        Ok(())
    }

    /// The allowlist identifier, or a configuration error if none was given.
    pub fn require_allowlist_id(&self) -> SwResult<&str> {
        match self.pipeline.allowlist_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(SwError::Configuration(
                "missing allowlist id: set ALLOWLIST_ID or pipeline.allowlist_id".into(),
            )),
        }
    }
}
