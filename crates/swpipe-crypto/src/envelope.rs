//! AES-256-GCM envelope encryption/decryption
//!
//! Envelope format (binary):
//! ```text
//! [12 bytes: random IV][16 bytes: GCM tag][N bytes: ciphertext]
//! ```
//!
//! The ciphertext is the same length as the plaintext; total envelope length
//! is always `28 + N`. No AAD is bound.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce, Tag,
};
use rand::RngCore;
use swpipe_core::{SwError, SwResult};
use zeroize::Zeroize;

use crate::key::DataKey;
use crate::{ALGORITHM, HEADER_SIZE, IV_SIZE};

/// Side-channel description of an envelope, handed from encrypt to upload
/// and decrypt alongside the envelope file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeMeta {
    pub algorithm: String,
    /// IV as lowercase hex
    pub iv: String,
}

impl EnvelopeMeta {
    /// Read the metadata back out of an envelope header.
    pub fn from_envelope(envelope: &[u8]) -> SwResult<Self> {
        let iv = envelope_iv(envelope)?;
        Ok(Self {
            algorithm: ALGORITHM.to_string(),
            iv: hex::encode(iv),
        })
    }

    /// Check that this metadata describes `envelope`.
    pub fn check(&self, envelope: &[u8]) -> SwResult<()> {
        if self.algorithm != ALGORITHM {
            return Err(SwError::Key(format!(
                "unsupported envelope algorithm '{}'",
                self.algorithm
            )));
        }
        let actual = hex::encode(envelope_iv(envelope)?);
        if actual != self.iv {
            return Err(SwError::Authentication(
                "envelope IV does not match its metadata".into(),
            ));
        }
        Ok(())
    }
}

/// Encrypt `plaintext` under `key` with a fresh random IV.
///
/// Returns `[12-byte IV][16-byte tag][ciphertext]`.
pub fn encrypt_envelope(key: &DataKey, plaintext: &[u8]) -> SwResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let mut body = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut body)
        .map_err(|e| anyhow::anyhow!("envelope encryption failed: {e}"))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(tag.as_slice());
    out.extend_from_slice(&body);

    tracing::trace!(plaintext_len = plaintext.len(), envelope_len = out.len(), "sealed envelope");
    Ok(out)
}

/// Authenticate and decrypt an envelope produced by [`encrypt_envelope`].
///
/// A wrong key or any modification of the IV, tag, or ciphertext fails with
/// `SwError::Authentication` and no plaintext is returned.
pub fn decrypt_envelope(key: &DataKey, envelope: &[u8]) -> SwResult<Vec<u8>> {
    if envelope.len() < HEADER_SIZE {
        return Err(SwError::Authentication(format!(
            "envelope too short: {} bytes (minimum {HEADER_SIZE})",
            envelope.len()
        )));
    }

    let (iv, rest) = envelope.split_at(IV_SIZE);
    let (tag, ciphertext) = rest.split_at(HEADER_SIZE - IV_SIZE);
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut body = ciphertext.to_vec();
    match cipher.decrypt_in_place_detached(
        Nonce::from_slice(iv),
        b"",
        &mut body,
        Tag::from_slice(tag),
    ) {
        Ok(()) => Ok(body),
        Err(_) => {
            body.zeroize();
            Err(SwError::Authentication(
                "envelope decryption failed: wrong key or corrupted data".into(),
            ))
        }
    }
}

fn envelope_iv(envelope: &[u8]) -> SwResult<&[u8]> {
    envelope.get(..IV_SIZE).ok_or_else(|| {
        SwError::Authentication(format!(
            "envelope too short: {} bytes (minimum {HEADER_SIZE})",
            envelope.len()
        ))
    })
}
