use thiserror::Error;

pub type SwResult<T> = Result<T, SwError>;

#[derive(Debug, Error)]
pub enum SwError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// AEAD tag did not verify. Never carries plaintext.
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Configuration(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("verification failed: {0}")]
    Verification(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwError {
    /// Short, stable name for the error class (used as a log field)
    pub fn kind(&self) -> &'static str {
        match self {
            SwError::Io(_) => "io",
            SwError::Authentication(_) => "authentication",
            SwError::NotFound(_) => "not_found",
            SwError::Configuration(_) => "configuration",
            SwError::Key(_) => "key",
            SwError::Storage(_) => "storage",
            SwError::NotImplemented(_) => "not_implemented",
            SwError::Verification(_) => "verification",
            SwError::Other(_) => "other",
        }
    }
}
