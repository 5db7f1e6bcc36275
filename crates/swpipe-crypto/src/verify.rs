//! Round-trip verification: compare original and recovered plaintext

use swpipe_core::{SwError, SwResult};

use crate::hash::sha256_hex;

/// True iff both buffers hash to the same SHA-256 digest.
pub fn verify_roundtrip(original: &[u8], recovered: &[u8]) -> bool {
    sha256_hex(original) == sha256_hex(recovered)
}

/// Like [`verify_roundtrip`], but a mismatch is an error.
pub fn ensure_roundtrip(original: &[u8], recovered: &[u8]) -> SwResult<()> {
    let expected = sha256_hex(original);
    let actual = sha256_hex(recovered);
    if expected == actual {
        tracing::debug!(hash = %&expected[..16], "round-trip verified");
        Ok(())
    } else {
        Err(SwError::Verification(format!(
            "recovered plaintext hash {}.. != original {}..",
            &actual[..16],
            &expected[..16]
        )))
    }
}
