use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};
use crate::query::ProductQuery;
use crate::update::{ProductPatch, ProductUpdate};

/// Repository trait for Product persistence
///
/// Every operation touches at most one record, except the two listing calls.
/// `update`, `patch` and `delete` report a missing record as
/// [`ProductError::NotFound`](crate::ProductError::NotFound), never as a store
/// failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in natural order
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    /// Persist a new product; id and created_at are assigned here
    async fn create(&self, input: ProductInput) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Product>;

    /// Overwrite name, description and price
    async fn update(&self, id: Uuid, update: ProductUpdate) -> ProductResult<()>;

    /// Set a subset of fields
    async fn patch(&self, id: Uuid, patch: ProductPatch) -> ProductResult<()>;

    async fn delete(&self, id: Uuid) -> ProductResult<()>;

    async fn search(&self, query: ProductQuery) -> ProductResult<Vec<Product>>;
}

/// Per-call deadlines for repository operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryTimeouts {
    /// Listing, creation and search
    pub long: Duration,
    /// Single-record reads and writes
    pub short: Duration,
}

impl RepositoryTimeouts {
    pub const fn new(long: Duration, short: Duration) -> Self {
        Self { long, short }
    }
}

impl Default for RepositoryTimeouts {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(5))
    }
}

/// Runs `fut` with a deadline. On expiry the future is dropped and
/// [`ProductError::Timeout`] is returned.
pub(crate) async fn with_timeout<T, F>(
    operation: &'static str,
    after: Duration,
    fut: F,
) -> ProductResult<T>
where
    F: Future<Output = ProductResult<T>>,
{
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?after, "Repository call timed out");
            Err(ProductError::Timeout { operation, after })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = RepositoryTimeouts::default();
        assert_eq!(timeouts.long, Duration::from_secs(10));
        assert_eq!(timeouts.short, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout("get", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let result: ProductResult<()> = with_timeout("find", Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(ProductError::Timeout { operation: "find", after }) if after == Duration::from_millis(50)
        ));
    }
}
