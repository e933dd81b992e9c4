//! Semaphore utilities for bounding the worker pool

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use vsixget_errors::Error;

/// Acquire a semaphore permit with proper error handling
///
/// # Errors
///
/// Returns an error if the semaphore is closed.
pub async fn acquire_semaphore_permit(
    semaphore: Arc<Semaphore>,
    operation: &str,
) -> Result<OwnedSemaphorePermit, Error> {
    semaphore
        .acquire_owned()
        .await
        .map_err(|_| Error::internal(format!("failed to acquire semaphore for {operation}")))
}

/// Create a semaphore with a specified number of permits
#[must_use]
pub fn create_semaphore(permits: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(permits.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permits_bound_concurrency() {
        let semaphore = create_semaphore(0);
        assert_eq!(semaphore.available_permits(), 1);

        let permit = acquire_semaphore_permit(semaphore.clone(), "test").await.unwrap();
        assert_eq!(semaphore.available_permits(), 0);
        drop(permit);

        semaphore.close();
        assert!(acquire_semaphore_permit(semaphore, "test").await.is_err());
    }
}
