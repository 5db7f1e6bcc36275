pub mod config;
pub mod error;
pub mod types;

pub use error::{SwError, SwResult};
pub use types::{BlobId, DocumentId, Keyspace, Mode};
