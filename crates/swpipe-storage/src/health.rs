//! Storage health check

use opendal::Operator;
use swpipe_core::{SwError, SwResult};

/// Verify the blob store root is reachable by listing it
pub async fn check_health(op: &Operator) -> SwResult<()> {
    op.list("/")
        .await
        .map(|_| ())
        .map_err(|e| SwError::Storage(format!("storage health check failed: {e}")))
}
