//! Content-addressed blob store
//!
//! `put` names a blob by the SHA-256 of its bytes; `get` re-hashes what it
//! reads and refuses to return bytes that do not match the requested id.

use opendal::{ErrorKind, Operator};
use swpipe_core::{BlobId, Keyspace, SwError, SwResult};
use tracing::{debug, warn};

/// Object path of a blob: `{keyspace}/{blob_id}.bin`
pub fn blob_path(keyspace: &Keyspace, blob_id: &BlobId) -> String {
    format!("{}/{}.bin", keyspace.as_str(), blob_id.as_str())
}

fn storage_err(what: &str, path: &str, e: opendal::Error) -> SwError {
    if e.kind() == ErrorKind::NotFound {
        SwError::NotFound(format!("blob {path}"))
    } else {
        SwError::Storage(format!("{what} {path}: {e}"))
    }
}

/// Blob store over any OpenDAL operator (filesystem in the pipeline,
/// in-memory in tests).
#[derive(Clone, Debug)]
pub struct BlobStore {
    op: Operator,
}

impl BlobStore {
    pub fn new(op: Operator) -> Self {
        Self { op }
    }

    pub fn operator(&self) -> &Operator {
        &self.op
    }

    /// Store `content` under `keyspace` and return its content address.
    ///
    /// The keyspace directory is created by the write. If a blob with the same
    /// address is already stored intact the write is skipped; a stored file
    /// whose bytes no longer hash to the address is overwritten.
    pub async fn put(&self, keyspace: &Keyspace, content: &[u8]) -> SwResult<BlobId> {
        let blob_id = swpipe_crypto::blob_id_for(content);
        let path = blob_path(keyspace, &blob_id);

        if self.contains(keyspace, &blob_id).await? {
            let stored = self
                .op
                .read(&path)
                .await
                .map_err(|e| storage_err("reading", &path, e))?
                .to_vec();
            if swpipe_crypto::blob_id_for(&stored) == blob_id {
                debug!(%path, "blob already stored");
                return Ok(blob_id);
            }
            warn!(%path, stored_len = stored.len(), "replacing corrupt blob");
        }

        self.op
            .write(&path, content.to_vec())
            .await
            .map_err(|e| storage_err("writing", &path, e))?;

        debug!(%path, bytes = content.len(), "blob stored");
        Ok(blob_id)
    }

    /// Read a blob back by content address.
    ///
    /// Fails with `NotFound` if the blob is absent from this keyspace and with
    /// `Storage` if the stored bytes no longer hash to `blob_id`.
    pub async fn get(&self, keyspace: &Keyspace, blob_id: &BlobId) -> SwResult<Vec<u8>> {
        let path = blob_path(keyspace, blob_id);
        let content = self
            .op
            .read(&path)
            .await
            .map_err(|e| storage_err("reading", &path, e))?
            .to_vec();

        let actual = swpipe_crypto::blob_id_for(&content);
        if &actual != blob_id {
            return Err(SwError::Storage(format!(
                "blob {path} is corrupt: content hashes to {actual}"
            )));
        }

        debug!(%path, bytes = content.len(), "blob read");
        Ok(content)
    }

    pub async fn contains(&self, keyspace: &Keyspace, blob_id: &BlobId) -> SwResult<bool> {
        let path = blob_path(keyspace, blob_id);
        self.op
            .exists(&path)
            .await
            .map_err(|e| storage_err("checking", &path, e))
    }
}
