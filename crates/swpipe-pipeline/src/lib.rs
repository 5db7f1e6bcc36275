//! swpipe-pipeline: the encrypt → upload → download → decrypt walk-through
//!
//! - `backend`: capability trait shared by the mock and real variants
//! - `mock`: local AES-GCM + filesystem blob store stand-in
//! - `real`: placeholders for the Sui allowlist, SEAL and Walrus
//! - `keystore`: per-backend in-memory DocumentId → key map
//! - `select`: pick a backend once from config
//! - `runner`: sequential pipeline, summary, and cleanup

pub mod backend;
pub mod keystore;
pub mod layout;
pub mod mock;
pub mod real;
pub mod runner;
pub mod select;

pub use backend::{AllowlistReceipt, Backend, EncryptedArtifact, KeyMaterial, SessionKey};
pub use keystore::KeyStore;
pub use layout::OutputLayout;
pub use mock::MockBackend;
pub use real::{RealBackend, RealSettings};
pub use runner::{Pipeline, PipelineRequest, RunSummary};
pub use select::{select_backend, SelectedBackend};
