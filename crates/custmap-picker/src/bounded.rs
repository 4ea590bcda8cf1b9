use custmap_core::error::{CustmapError, Result};
use std::future::Future;
use std::time::Duration;

/// Run a gateway call under a deadline; expiry becomes `CustmapError::Timeout`
pub(crate) async fn bounded<T, F>(operation: &str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CustmapError::Timeout {
            operation: operation.to_string(),
            after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
