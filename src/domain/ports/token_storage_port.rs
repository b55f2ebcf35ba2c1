//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;

/// Port for session token persistence.
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves the stored token; `None` means no prior session.
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError>;

    /// Replaces the stored token.
    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError>;

    /// Deletes the stored token. Deleting a missing token succeeds.
    async fn delete_token(&self) -> Result<(), AuthError>;

    /// Checks if token exists.
    async fn has_token(&self) -> Result<bool, AuthError> {
        Ok(self.get_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    /// Mock token storage for testing.
    pub struct MockTokenStorage {
        token: Arc<RwLock<Option<AuthToken>>>,
        fail_writes: AtomicBool,
    }

    impl MockTokenStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
                fail_writes: AtomicBool::new(false),
            }
        }

        /// Creates mock storage with token.
        pub fn with_token(token: AuthToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
                fail_writes: AtomicBool::new(false),
            }
        }

        /// Makes every write fail like a read-only config directory.
        pub fn failing_writes() -> Self {
            let storage = Self::new();
            storage.fail_writes.store(true, Ordering::SeqCst);
            storage
        }
    }

    impl Default for MockTokenStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TokenStoragePort for MockTokenStorage {
        async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AuthError::storage_failed("mock storage is read-only"));
            }
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), AuthError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AuthError::storage_failed("mock storage is read-only"));
            }
            *self.token.write().await = None;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTokenStorage;
    use super::*;

    #[test]
    fn test_has_token_follows_get_token() {
        let empty = MockTokenStorage::new();
        let stored = MockTokenStorage::with_token(AuthToken::new_unchecked("abc.def"));

        assert!(!tokio_test::block_on(empty.has_token()).unwrap());
        assert!(tokio_test::block_on(stored.has_token()).unwrap());
    }

    #[test]
    fn test_failed_delete_is_storage_error() {
        let storage = MockTokenStorage::failing_writes();

        let result = tokio_test::block_on(storage.delete_token());
        assert!(matches!(result, Err(AuthError::TokenStorageFailed { .. })));
    }
}
