//! End-to-end tests for the mock pipeline.
//!
//! Drives the full encrypt → upload → download → decrypt → verify walk on a
//! temporary output root and checks the on-disk layout along the way.

use std::path::Path;
use tempfile::TempDir;

use swpipe_core::{BlobId, DocumentId, Keyspace, Mode, SwError, SwResult};
use swpipe_crypto::{blob_id_for, document_id_for_allowlist, sha256_hex, EnvelopeMeta};
use swpipe_pipeline::{
    AllowlistReceipt, Backend, EncryptedArtifact, KeyMaterial, MockBackend, OutputLayout,
    Pipeline, PipelineRequest, SessionKey,
};

fn write_input(dir: &Path, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join("input.txt");
    std::fs::write(&path, content).expect("write input");
    path
}

fn request(tmp: &TempDir, content: &[u8], allowlist_id: &str, keyspace: &str) -> PipelineRequest {
    PipelineRequest {
        input: write_input(tmp.path(), content),
        allowlist_id: allowlist_id.to_string(),
        keyspace: Keyspace::new(keyspace).unwrap(),
        output_dir: tmp.path().join("out"),
    }
}

fn mock_backend(tmp: &TempDir) -> MockBackend {
    MockBackend::local(OutputLayout::new(tmp.path().join("out"))).expect("mock backend")
}

#[derive(Clone, Copy)]
enum Fault {
    /// The blob vanishes from the store before it is read back
    LoseBlob,
    /// Decryption hands back bytes other than what was encrypted
    WrongPlaintext,
}

/// Mock backend with one injected fault
struct Faulty {
    inner: MockBackend,
    fault: Fault,
}

impl Backend for Faulty {
    fn mode(&self) -> Mode {
        self.inner.mode()
    }

    async fn preflight(&self) -> SwResult<()> {
        self.inner.preflight().await
    }

    async fn add_allowlist_entry(&self, allowlist_id: &str) -> SwResult<AllowlistReceipt> {
        self.inner.add_allowlist_entry(allowlist_id).await
    }

    async fn encrypt(
        &mut self,
        plaintext: &[u8],
        document_id: &DocumentId,
    ) -> SwResult<EncryptedArtifact> {
        self.inner.encrypt(plaintext, document_id).await
    }

    async fn upload(
        &self,
        envelope: &[u8],
        meta: &EnvelopeMeta,
        keyspace: &Keyspace,
    ) -> SwResult<BlobId> {
        self.inner.upload(envelope, meta, keyspace).await
    }

    async fn download(&self, blob_id: &BlobId, keyspace: &Keyspace) -> SwResult<Vec<u8>> {
        match self.fault {
            Fault::LoseBlob => Err(SwError::NotFound(format!("blob {keyspace}/{blob_id}.bin"))),
            Fault::WrongPlaintext => self.inner.download(blob_id, keyspace).await,
        }
    }

    async fn create_session_key(&self) -> SwResult<SessionKey> {
        self.inner.create_session_key().await
    }

    async fn fetch_decryption_keys(
        &self,
        session: &SessionKey,
        document_id: &DocumentId,
    ) -> SwResult<KeyMaterial> {
        self.inner.fetch_decryption_keys(session, document_id).await
    }

    async fn decrypt(
        &self,
        envelope: &[u8],
        key: &KeyMaterial,
        meta: &EnvelopeMeta,
    ) -> SwResult<Vec<u8>> {
        let mut plaintext = self.inner.decrypt(envelope, key, meta).await?;
        if let Fault::WrongPlaintext = self.fault {
            plaintext.push(b'!');
        }
        Ok(plaintext)
    }
}

fn faulty_backend(tmp: &TempDir, fault: Fault) -> Faulty {
    Faulty {
        inner: mock_backend(tmp),
        fault,
    }
}

#[tokio::test]
async fn hello_world_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");
    let mut pipeline = Pipeline::new(
        mock_backend(&tmp),
        request(&tmp, b"hello world", "0xAllowList", "default"),
    );

    let summary = pipeline.run().await.expect("pipeline should succeed");

    assert_eq!(summary.mode, Mode::Mock);
    assert_eq!(summary.document_id.as_str(), sha256_hex("0xallowlist"));
    assert_eq!(summary.document_id.as_str().len(), 64);
    assert_eq!(summary.plaintext_len, 11);
    assert_eq!(summary.envelope_len, 39);
    assert_eq!(summary.downloaded_len, 39);

    // encrypted/<documentId>.bin holds the envelope
    let envelope_path = out
        .join("encrypted")
        .join(format!("{}.bin", summary.document_id));
    assert_eq!(summary.encrypted_path, envelope_path);
    let envelope = std::fs::read(&envelope_path).unwrap();
    assert_eq!(envelope.len(), 39);

    // walrus/<keyspace>/<blobId>.bin holds the same bytes, named by their hash
    assert_eq!(summary.blob_id, blob_id_for(&envelope));
    let blob_path = out
        .join("walrus")
        .join("default")
        .join(format!("{}.bin", summary.blob_id));
    assert_eq!(std::fs::read(blob_path).unwrap(), envelope);

    // decrypted/<documentId>.decrypted holds the plaintext
    assert_eq!(std::fs::read(&summary.decrypted_path).unwrap(), b"hello world");
}

#[tokio::test]
async fn empty_file_roundtrips() {
    let tmp = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(mock_backend(&tmp), request(&tmp, b"", "empty", "default"));

    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.envelope_len, 28);
    assert!(std::fs::read(&summary.decrypted_path).unwrap().is_empty());
}

#[tokio::test]
async fn allowlist_case_does_not_change_document_id() {
    let upper_tmp = TempDir::new().unwrap();
    let lower_tmp = TempDir::new().unwrap();

    let upper = Pipeline::new(
        mock_backend(&upper_tmp),
        request(&upper_tmp, b"x", "0xABCDEF", "default"),
    )
    .run()
    .await
    .unwrap();
    let lower = Pipeline::new(
        mock_backend(&lower_tmp),
        request(&lower_tmp, b"x", "0xabcdef", "default"),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(upper.document_id, lower.document_id);
}

#[tokio::test]
async fn blob_is_invisible_from_other_keyspace() {
    let tmp = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(
        mock_backend(&tmp),
        request(&tmp, b"partitioned", "0xlist", "team-a"),
    );
    let summary = pipeline.run().await.unwrap();

    let backend = pipeline.backend();
    let result = backend
        .download(&summary.blob_id, &Keyspace::new("team-b").unwrap())
        .await;
    assert!(matches!(result, Err(SwError::NotFound(_))));

    let same = backend
        .download(&summary.blob_id, &Keyspace::new("team-a").unwrap())
        .await
        .unwrap();
    assert_eq!(same.len() as u64, summary.envelope_len);
}

#[tokio::test]
async fn tampered_envelope_never_yields_plaintext() {
    let tmp = TempDir::new().unwrap();
    let mut backend = mock_backend(&tmp);
    let doc = document_id_for_allowlist("0xlist");
    let keyspace = Keyspace::default();

    let artifact = backend.encrypt(b"attack at dawn", &doc).await.unwrap();
    let mut envelope = std::fs::read(&artifact.path).unwrap();
    // flip one ciphertext bit after the 28-byte header
    envelope[30] ^= 0x04;

    let blob_id = backend
        .upload(&envelope, &artifact.meta, &keyspace)
        .await
        .unwrap();
    let downloaded = backend.download(&blob_id, &keyspace).await.unwrap();
    let session = backend.create_session_key().await.unwrap();
    let key = backend.fetch_decryption_keys(&session, &doc).await.unwrap();

    let result = backend.decrypt(&downloaded, &key, &artifact.meta).await;
    assert!(matches!(result, Err(SwError::Authentication(_))));
}

#[tokio::test]
async fn fetch_keys_in_fresh_backend_fails() {
    let tmp = TempDir::new().unwrap();
    let doc = document_id_for_allowlist("0xlist");

    let mut first = mock_backend(&tmp);
    first.encrypt(b"data", &doc).await.unwrap();

    // a second backend has its own key store and knows nothing of `doc`
    let second = mock_backend(&tmp);
    let session = second.create_session_key().await.unwrap();
    let result = second.fetch_decryption_keys(&session, &doc).await;
    assert!(matches!(result, Err(SwError::Key(_))));
}

#[tokio::test]
async fn cleanup_after_success_removes_outputs_but_not_blobs() {
    let tmp = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(
        mock_backend(&tmp),
        request(&tmp, b"temporary", "0xlist", "default"),
    );
    let summary = pipeline.run().await.unwrap();

    pipeline.cleanup().await;

    assert!(!summary.encrypted_path.exists());
    assert!(!summary.decrypted_path.exists());
    let blob_path = tmp
        .path()
        .join("out/walrus/default")
        .join(format!("{}.bin", summary.blob_id));
    assert!(blob_path.exists(), "uploaded blobs are not temporary artifacts");
}

#[tokio::test]
async fn cleanup_after_failed_download_removes_envelope() {
    let tmp = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(
        faulty_backend(&tmp, Fault::LoseBlob),
        request(&tmp, b"never comes back", "0xlist", "default"),
    );

    let result = pipeline.run().await;
    assert!(matches!(result, Err(SwError::NotFound(_))));

    let doc = document_id_for_allowlist("0xlist");
    let envelope_path = tmp
        .path()
        .join("out/encrypted")
        .join(format!("{doc}.bin"));
    assert!(envelope_path.exists());
    assert_eq!(pipeline.artifacts(), &[envelope_path.clone()]);

    pipeline.cleanup().await;

    assert!(!envelope_path.exists());
    assert!(pipeline.artifacts().is_empty());
}

#[tokio::test]
async fn plaintext_mismatch_is_verification_error() {
    let tmp = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(
        faulty_backend(&tmp, Fault::WrongPlaintext),
        request(&tmp, b"hello world", "0xlist", "default"),
    );

    let result = pipeline.run().await;
    assert!(matches!(result, Err(SwError::Verification(_))));

    // the mismatching output is still on disk for inspection until cleanup
    let doc = document_id_for_allowlist("0xlist");
    let decrypted = tmp
        .path()
        .join("out/decrypted")
        .join(format!("{doc}.decrypted"));
    assert_eq!(std::fs::read(&decrypted).unwrap(), b"hello world!");

    pipeline.cleanup().await;
    assert!(!decrypted.exists());
}
