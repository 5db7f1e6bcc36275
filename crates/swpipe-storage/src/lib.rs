//! swpipe-storage: content-addressed blob store on OpenDAL
//!
//! Layout: `{root}/{keyspace}/{blob_id}.bin`, raw bytes, no header. In the
//! pipeline `{root}` is `{output_dir}/walrus`.

pub mod blob;
pub mod health;
pub mod operator;

pub use blob::{blob_path, BlobStore};
pub use health::check_health;
pub use operator::{build_local_operator, walrus_root};
