//! Plain-file token storage.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStoragePort;

/// Name of the token file inside the config directory.
pub const TOKEN_FILE_NAME: &str = "discordauth.txt";

/// Stores the session token as a single line of text.
///
/// The containing directory is never created here; it is expected to exist
/// already (the config directory is set up at startup).
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates storage backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates storage using [`TOKEN_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_FILE_NAME))
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl TokenStoragePort for FileTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, AuthError> {
        debug!(path = %self.path.display(), "Reading stored token");

        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = AuthToken::new(&contents);
                if token.is_none() {
                    debug!("Token file is empty, treating as no session");
                }
                Ok(token)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored token");
                Ok(None)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read token file");
                Err(AuthError::retrieval_failed(e.to_string()))
            }
        }
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), AuthError> {
        debug!(path = %self.path.display(), token = %token, "Storing token");

        let path = self.path.clone();
        let contents = token.as_str().to_owned();

        tokio::task::spawn_blocking(move || Self::write_atomically(&path, &contents))
            .await
            .map_err(|e| AuthError::storage_failed(format!("write task failed: {e}")))?
            .map_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Failed to write token file");
                AuthError::storage_failed(e.to_string())
            })?;

        debug!("Token stored");
        Ok(())
    }

    async fn delete_token(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Token file deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No token file to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete token file");
                Err(AuthError::storage_failed(e.to_string()))
            }
        }
    }
}
