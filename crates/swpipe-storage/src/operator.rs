//! OpenDAL Operator factory for the local blob store

use anyhow::{Context, Result};
use opendal::Operator;
use std::path::{Path, PathBuf};

/// Blob store root under a pipeline output directory
pub fn walrus_root(output_dir: &Path) -> PathBuf {
    output_dir.join("walrus")
}

/// Build an OpenDAL filesystem Operator rooted at `root`.
///
/// The directory is created if missing. Relative roots are resolved against
/// the current directory so the operator does not depend on later `chdir`s.
pub fn build_local_operator(root: &Path) -> Result<Operator> {
    let root = std::path::absolute(root)
        .with_context(|| format!("resolving blob store root: {}", root.display()))?;
    std::fs::create_dir_all(&root)
        .with_context(|| format!("creating blob store root: {}", root.display()))?;

    // opendal 0.55: builders use the consuming pattern
    let builder = opendal::services::Fs::default().root(&root.to_string_lossy());

    let op = Operator::new(builder)
        .context("creating OpenDAL fs operator")?
        .layer(opendal::layers::LoggingLayer::default())
        .finish();

    Ok(op)
}
