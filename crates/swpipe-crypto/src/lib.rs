//! swpipe-crypto: local stand-in for the SEAL encryption service
//!
//! Envelope layout (binary):
//! ```text
//! [12 bytes: IV][16 bytes: GCM tag][N bytes: ciphertext]
//! ```
//!
//! Keys are 256-bit, random, one per document. SHA-256 hex digests name
//! documents (from the allowlist id) and blobs (from their bytes).

pub mod envelope;
pub mod hash;
pub mod key;
pub mod verify;

pub use envelope::{decrypt_envelope, encrypt_envelope, EnvelopeMeta};
pub use hash::{blob_id_for, document_id_for_allowlist, legacy_document_id, sha256_hex};
pub use key::{generate_data_key, DataKey};
pub use verify::{ensure_roundtrip, verify_roundtrip};

/// Size of a data key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM IV (96-bit)
pub const IV_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Envelope bytes preceding the ciphertext
pub const HEADER_SIZE: usize = IV_SIZE + TAG_SIZE;

/// Algorithm label carried in envelope metadata
pub const ALGORITHM: &str = "aes-256-gcm";
