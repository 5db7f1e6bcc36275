//! Pipeline runner: allowlist → encrypt → upload → download → decrypt → verify
//!
//! Steps run strictly in order and the first failure aborts the run. Files
//! written along the way are recorded so [`Pipeline::cleanup`] can remove
//! them afterwards, whether the run succeeded or not.

use std::path::PathBuf;
use tracing::{error, info, info_span, warn, Instrument};

use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwError, SwResult};
use swpipe_crypto::{document_id_for_allowlist, ensure_roundtrip};

use crate::backend::Backend;
use crate::layout::OutputLayout;
use crate::mock::{io_err, write_file};

/// Inputs for one run
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: PathBuf,
    pub allowlist_id: String,
    pub keyspace: Keyspace,
    pub output_dir: PathBuf,
}

/// What a successful run produced. A summary exists only once the recovered
/// plaintext has matched the input.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: Mode,
    pub document_id: DocumentId,
    pub allowlist_tx: String,
    pub encrypted_path: PathBuf,
    pub plaintext_len: u64,
    pub envelope_len: u64,
    pub blob_id: BlobId,
    pub downloaded_len: u64,
    pub decrypted_path: PathBuf,
}

pub struct Pipeline<B> {
    backend: B,
    request: PipelineRequest,
    layout: OutputLayout,
    artifacts: Vec<PathBuf>,
}

async fn step<T, F>(name: &'static str, fut: F) -> SwResult<T>
where
    F: std::future::Future<Output = SwResult<T>>,
{
    info!(step = name, "starting");
    let result = fut.instrument(info_span!("step", step = name)).await;
    if let Err(e) = &result {
        error!(step = name, kind = e.kind(), error = %e, "step failed");
    }
    result
}

impl<B: Backend> Pipeline<B> {
    pub fn new(backend: B, request: PipelineRequest) -> Self {
        let layout = OutputLayout::new(&request.output_dir);
        Self {
            backend,
            request,
            layout,
            artifacts: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Files written so far by this pipeline
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// Run every step once, in order.
    ///
    /// A verification mismatch is returned as `SwError::Verification`.
    pub async fn run(&mut self) -> SwResult<RunSummary> {
        let mode = self.backend.mode();
        let document_id = document_id_for_allowlist(&self.request.allowlist_id);
        info!(
            %mode,
            %document_id,
            input = %self.request.input.display(),
            keyspace = %self.request.keyspace,
            "pipeline starting"
        );

        step("preflight", self.backend.preflight()).await?;

        let receipt = step(
            "allowlist",
            self.backend.add_allowlist_entry(&self.request.allowlist_id),
        )
        .await?;

        let input = self.request.input.clone();
        let original = step("read-input", async {
            tokio::fs::read(&input)
                .await
                .map_err(|e| io_err("reading", &input, e))
        })
        .await?;

        let artifact = step("encrypt", self.backend.encrypt(&original, &document_id)).await?;
        self.artifacts.push(artifact.path.clone());

        let envelope = step("read-envelope", async {
            tokio::fs::read(&artifact.path)
                .await
                .map_err(|e| io_err("reading", &artifact.path, e))
        })
        .await?;

        let keyspace = self.request.keyspace.clone();
        let blob_id = step(
            "upload",
            self.backend.upload(&envelope, &artifact.meta, &keyspace),
        )
        .await?;

        let backend = &self.backend;
        let downloaded = step("download", async {
            let downloaded = backend.download(&blob_id, &keyspace).await?;
            if downloaded != envelope {
                return Err(SwError::Storage(format!(
                    "downloaded blob {blob_id} differs from uploaded envelope"
                )));
            }
            Ok::<_, SwError>(downloaded)
        })
        .await?;

        let session = step("session", self.backend.create_session_key()).await?;
        let key = step(
            "fetch-keys",
            self.backend.fetch_decryption_keys(&session, &document_id),
        )
        .await?;

        let plaintext = step(
            "decrypt",
            self.backend.decrypt(&downloaded, &key, &artifact.meta),
        )
        .await?;

        let decrypted_path = self.layout.decrypted_path(&document_id);
        step("write-output", write_file(&decrypted_path, &plaintext)).await?;
        self.artifacts.push(decrypted_path.clone());

        step("verify", async { ensure_roundtrip(&original, &plaintext) }).await?;

        let summary = RunSummary {
            mode,
            document_id,
            allowlist_tx: receipt.tx_hash,
            encrypted_path: artifact.path,
            plaintext_len: artifact.plaintext_len,
            envelope_len: artifact.envelope_len,
            blob_id,
            downloaded_len: downloaded.len() as u64,
            decrypted_path,
        };

        info!(
            mode = %summary.mode,
            document_id = %summary.document_id,
            blob_id = %summary.blob_id,
            encrypted = %summary.encrypted_path.display(),
            decrypted = %summary.decrypted_path.display(),
            "pipeline complete, verification passed"
        );
        Ok(summary)
    }

    /// Remove every file this pipeline wrote. Failures are logged, not
    /// returned.
    pub async fn cleanup(&mut self) {
        for path in self.artifacts.drain(..) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!(path = %path.display(), "removed artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "cleanup failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use tempfile::TempDir;

    fn request(tmp: &TempDir, content: &[u8]) -> PipelineRequest {
        let input = tmp.path().join("input.txt");
        std::fs::write(&input, content).unwrap();
        PipelineRequest {
            input,
            allowlist_id: "0xAllowList".into(),
            keyspace: Keyspace::default(),
            output_dir: tmp.path().join("out"),
        }
    }

    fn mock(tmp: &TempDir) -> MockBackend {
        MockBackend::local(OutputLayout::new(tmp.path().join("out"))).unwrap()
    }

    #[tokio::test]
    async fn run_records_artifacts() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(mock(&tmp), request(&tmp, b"hello world"));

        let summary = pipeline.run().await.unwrap();

        assert_eq!(
            pipeline.artifacts(),
            &[summary.encrypted_path.clone(), summary.decrypted_path.clone()]
        );
        assert_eq!(pipeline.backend().keys().len(), 1);
    }

    #[tokio::test]
    async fn cleanup_removes_artifacts_and_tolerates_missing() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(mock(&tmp), request(&tmp, b"bye"));
        let summary = pipeline.run().await.unwrap();

        std::fs::remove_file(&summary.decrypted_path).unwrap();
        pipeline.cleanup().await;

        assert!(!summary.encrypted_path.exists());
        assert!(pipeline.artifacts().is_empty());
    }

    #[tokio::test]
    async fn missing_input_aborts_before_encrypt() {
        let tmp = TempDir::new().unwrap();
        let mut req = request(&tmp, b"");
        req.input = tmp.path().join("does-not-exist.txt");
        let mut pipeline = Pipeline::new(mock(&tmp), req);

        let result = pipeline.run().await;
        assert!(matches!(result, Err(SwError::Io(_))));
        assert!(pipeline.artifacts().is_empty());
    }
}
