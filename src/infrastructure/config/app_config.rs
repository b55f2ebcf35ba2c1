//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::domain::ports::MAX_MESSAGE_LIMIT;
use crate::domain::session::DEFAULT_API_BASE;
use crate::infrastructure::image::DEFAULT_CDN_BASE;

/// Directory name shared with earlier QTCord releases (`~/.config/QTCord`,
/// `~/.cache/QTCord` on Linux).
const APP_NAME: &str = "QTCord";

const LOG_FILE_NAME: &str = "qtcord.log";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration from `config.toml` and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Session token given on the command line or environment.
    #[serde(skip)]
    pub token: Option<String>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// REST API origin.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// CDN origin for guild icons.
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,

    /// Messages fetched per history request (1 to 100).
    #[serde(default = "default_message_limit")]
    pub message_limit: u8,
}

/// Platform directories for the application.
///
/// Built from the bare application name; `ProjectDirs::from` would lowercase it.
pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from_path(PathBuf::from(APP_NAME))
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_cdn_base() -> String {
    DEFAULT_CDN_BASE.to_string()
}

const fn default_message_limit() -> u8 {
    MAX_MESSAGE_LIMIT
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if let Some(api_base) = &args.api_base {
            self.api_base.clone_from(api_base);
        }
    }

    /// Message limit clamped to what the API accepts.
    #[must_use]
    pub fn effective_message_limit(&self) -> u8 {
        self.message_limit.clamp(1, MAX_MESSAGE_LIMIT)
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE_NAME))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            token: None,
            log_level: LogLevel::Info,
            api_base: default_api_base(),
            cdn_base: default_cdn_base(),
            message_limit: default_message_limit(),
        }
    }
}
