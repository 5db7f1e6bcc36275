//! Per-document data keys

use rand::RngCore;
use swpipe_core::{SwError, SwResult};
use zeroize::Zeroize;

use crate::KEY_SIZE;

/// A per-document 256-bit encryption key. Zeroized on drop.
#[derive(Clone)]
pub struct DataKey {
    bytes: [u8; KEY_SIZE],
}

impl DataKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a key from untrusted key material, rejecting anything that is
    /// not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> SwResult<Self> {
        let arr: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            SwError::Key(format!(
                "data key must be {KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_bytes(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DataKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit data key.
pub fn generate_data_key() -> DataKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    DataKey::from_bytes(bytes)
}
