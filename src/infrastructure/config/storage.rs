use super::app_config::{AppConfig, project_dirs};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::infrastructure::storage::TOKEN_FILE_NAME;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Locates and manages the config and cache directories.
pub struct StorageManager {
    config_dir: PathBuf,
    cache_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = project_dirs().ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a new `StorageManager` rooted at specific directories (useful for testing).
    #[must_use]
    pub fn with_dirs(config_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            config_dir,
            cache_dir,
        }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the stored session token.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE_NAME)
    }

    /// Root directory of the guild icon cache.
    #[must_use]
    pub fn icon_cache_root(&self) -> &Path {
        &self.cache_dir
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!("Creating configuration directory at {:?}", self.config_dir);
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        self.ensure_config_dir()?;
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            std::path::Path::to_path_buf,
        );

        if !config_path.exists() {
            info!(
                "Config file not found at {:?}, creating default.",
                config_path
            );
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Saves the application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let path = config
            .config
            .clone()
            .unwrap_or_else(|| self.config_dir.join(CONFIG_FILE_NAME));
        Self::save_to_file(&path, config)
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::LogLevel;
    use tempfile::tempdir;

    fn manager(root: &Path) -> StorageManager {
        StorageManager::with_dirs(root.join("config"), root.join("cache"))
    }

    #[test]
    fn test_ensure_config_dir_creates_directory() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        assert!(!manager.config_dir().exists());
        manager.ensure_config_dir().unwrap();
        assert!(manager.config_dir().exists());
    }

    #[test]
    fn test_load_config_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.message_limit, 100);

        let config_file = manager.config_dir().join(CONFIG_FILE_NAME);
        assert!(config_file.exists());
    }

    #[test]
    fn test_load_config_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());
        manager.ensure_config_dir().unwrap();
        let config_file = manager.config_dir().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "message_limit = [").unwrap();

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.message_limit, 100);
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "message_limit = [");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        let config = AppConfig {
            log_level: LogLevel::Debug,
            message_limit: 25,
            ..AppConfig::default()
        };
        manager.save_config(&config).unwrap();

        let loaded = manager.load_config(None).unwrap();
        assert_eq!(loaded.log_level, LogLevel::Debug);
        assert_eq!(loaded.message_limit, 25);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_default_dirs_match_existing_installs() {
        let manager = StorageManager::new().unwrap();

        assert!(manager.token_path().ends_with("QTCord/discordauth.txt"));
        assert!(manager.icon_cache_root().ends_with("QTCord"));
    }

    #[test]
    fn test_paths() {
        let dir = tempdir().unwrap();
        let manager = manager(dir.path());

        assert_eq!(
            manager.token_path(),
            dir.path().join("config").join("discordauth.txt")
        );
        assert_eq!(manager.icon_cache_root(), dir.path().join("cache"));
    }
}
