//! Identifier newtypes shared across the pipeline crates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SwError, SwResult};

/// Length of a hex-encoded SHA-256 digest
pub const DIGEST_HEX_LEN: usize = 64;

fn check_digest_hex(what: &str, s: &str) -> SwResult<()> {
    if s.len() != DIGEST_HEX_LEN {
        return Err(SwError::Configuration(format!(
            "{what} must be {DIGEST_HEX_LEN} hex chars, got {}",
            s.len()
        )));
    }
    if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(SwError::Configuration(format!(
            "{what} must be lowercase hex: {s}"
        )));
    }
    Ok(())
}

/// Logical document identifier: lowercase hex SHA-256, 64 chars.
///
/// Binds an envelope on disk (`encrypted/<id>.bin`) and its key in the key
/// store to one logical document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    pub fn from_hex(hex: &str) -> SwResult<Self> {
        check_digest_hex("document id", hex)?;
        Ok(Self(hex.to_string()))
    }

    /// Wrap a raw SHA-256 digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content address of a stored blob: lowercase hex SHA-256 of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobId(String);

impl BlobId {
    pub fn from_hex(hex: &str) -> SwResult<Self> {
        check_digest_hex("blob id", hex)?;
        Ok(Self(hex.to_string()))
    }

    /// Wrap a raw SHA-256 digest.
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Namespace partitioning the blob store. Maps to one directory.
///
/// Restricted to `[a-z0-9._-]` (and not `.`/`..`) so two distinct
/// keyspaces can never resolve to the same directory, including on
/// case-insensitive filesystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Keyspace(String);

impl Keyspace {
    pub fn new(name: &str) -> SwResult<Self> {
        if name.is_empty() {
            return Err(SwError::Configuration("keyspace must not be empty".into()));
        }
        if name == "." || name == ".." {
            return Err(SwError::Configuration(format!(
                "keyspace may not be '{name}'"
            )));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
        {
            return Err(SwError::Configuration(format!(
                "keyspace '{name}' contains invalid character {bad:?}"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Self("default".into())
    }
}

/// Backend selection: local simulation or real external services
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Mock,
    Real,
}

impl FromStr for Mode {
    type Err = SwError;

    fn from_str(s: &str) -> SwResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "real" => Ok(Mode::Real),
            other => Err(SwError::Configuration(format!(
                "unknown mode '{other}' (expected mock or real)"
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Mock => f.write_str("MOCK"),
            Mode::Real => f.write_str("REAL"),
        }
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident, $ctor:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = SwError;

            fn try_from(s: String) -> SwResult<Self> {
                $ty::$ctor(&s)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.0
            }
        }

        impl FromStr for $ty {
            type Err = SwError;

            fn from_str(s: &str) -> SwResult<Self> {
                $ty::$ctor(s)
            }
        }
    };
}

string_newtype_impls!(DocumentId, from_hex);
string_newtype_impls!(BlobId, from_hex);
string_newtype_impls!(Keyspace, new);
