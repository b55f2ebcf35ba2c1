//! Token resolution use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::TokenSource;
use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;
use crate::domain::session::SessionState;

/// Resolved token with its source.
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    /// The authentication token.
    pub token: AuthToken,
    /// Source of the token.
    pub source: TokenSource,
}

impl ResolvedToken {
    /// Creates new resolved token.
    #[must_use]
    pub const fn new(token: AuthToken, source: TokenSource) -> Self {
        Self { token, source }
    }
}

/// Resolves the startup token and loads it into the session.
pub struct ResolveTokenUseCase {
    storage_port: Arc<dyn TokenStoragePort>,
    session: Arc<SessionState>,
}

impl ResolveTokenUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn TokenStoragePort>, session: Arc<SessionState>) -> Self {
        Self {
            storage_port,
            session,
        }
    }

    /// Resolves token from the token file or CLI/Env.
    ///
    /// Priority:
    /// 1. Token file
    /// 2. CLI/Env (passed as argument)
    ///
    /// # Errors
    /// Currently infallible; an unreadable token file falls through to the next source.
    pub async fn execute(
        &self,
        cli_token: Option<String>,
    ) -> Result<Option<ResolvedToken>, AuthError> {
        let resolved = self.resolve(cli_token).await;

        if let Some(resolved) = &resolved {
            self.session.set_credential(resolved.token.clone());
        }

        Ok(resolved)
    }

    async fn resolve(&self, cli_token: Option<String>) -> Option<ResolvedToken> {
        debug!("Checking token file");
        match self.storage_port.get_token().await {
            Ok(Some(token)) => {
                info!("Using stored token");
                return Some(ResolvedToken::new(token, TokenSource::StoredFile));
            }
            Ok(None) => {
                debug!("No stored token");
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
            }
        }

        if let Some(token_str) = cli_token.filter(|s| !s.trim().is_empty()) {
            debug!("Checking command-line/env token");
            if let Some(token) = AuthToken::new(&token_str) {
                info!("Using token from command line / environment");
                return Some(ResolvedToken::new(token, TokenSource::CommandLine));
            }
            warn!("Command-line token is not a usable header value");
        }

        debug!("No token found in any source");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockTokenStorage;

    fn make_valid_token() -> String {
        "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY".to_string()
    }

    fn use_case(storage: MockTokenStorage) -> (ResolveTokenUseCase, Arc<SessionState>) {
        let session = Arc::new(SessionState::with_defaults());
        (
            ResolveTokenUseCase::new(Arc::new(storage), session.clone()),
            session,
        )
    }

    #[tokio::test]
    async fn test_stored_file_priority() {
        let (use_case, session) = use_case(MockTokenStorage::with_token(
            AuthToken::new_unchecked(make_valid_token()),
        ));

        let result = use_case
            .execute(Some("cli.token.here".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.source, TokenSource::StoredFile);
        assert_eq!(
            session.credential().map(AuthToken::into_inner),
            Some(make_valid_token())
        );
    }

    #[tokio::test]
    async fn test_cli_fallback() {
        let (use_case, session) = use_case(MockTokenStorage::new());

        let result = use_case.execute(Some(make_valid_token())).await.unwrap();

        assert_eq!(result.unwrap().source, TokenSource::CommandLine);
        assert!(session.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_no_token_found() {
        let (use_case, session) = use_case(MockTokenStorage::new());

        let result = use_case.execute(Some("   ".to_string())).await.unwrap();

        assert!(result.is_none());
        assert!(!session.current().is_authenticated());
    }
}
