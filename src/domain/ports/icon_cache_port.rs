//! Port definition for guild icon caching.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::{GuildId, GuildSummary};

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while caching one icon.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// I/O error during cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during download.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The CDN answered with an unusable status.
    #[error("CDN returned HTTP {0}")]
    UnexpectedStatus(u16),
}

/// How cached icons are keyed and invalidated.
///
/// Icons are keyed by guild ID only and never expire; a file that exists is
/// never fetched again, even if the guild changed its icon since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IconCachePolicy;

impl IconCachePolicy {
    /// Subdirectory of the cache root holding guild icons.
    pub const SUBDIRECTORY: &'static str = "servers";

    /// File extension of cached icons.
    pub const EXTENSION: &'static str = "png";

    /// File name for a guild's icon.
    #[must_use]
    pub fn file_name(guild_id: &GuildId) -> String {
        format!("{guild_id}.{}", Self::EXTENSION)
    }
}

/// Port for making sure guild icons exist on disk.
#[async_trait]
pub trait IconCachePort: Send + Sync {
    /// Caches the icon of every guild that has one and returns the guilds
    /// unchanged, in the same order. Individual failures are swallowed.
    async fn ensure_guild_icons(&self, guilds: Vec<GuildSummary>) -> Vec<GuildSummary>;

    /// Path where the icon of a guild is (or would be) cached.
    fn icon_path(&self, guild_id: &GuildId) -> PathBuf;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Icon cache that only records which guild lists it saw.
    #[derive(Default)]
    pub struct RecordingIconCache {
        seen: Mutex<Vec<Vec<GuildSummary>>>,
    }

    impl RecordingIconCache {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of `ensure_guild_icons` calls.
        pub fn calls(&self) -> usize {
            self.seen.lock().len()
        }
    }

    #[async_trait]
    impl IconCachePort for RecordingIconCache {
        async fn ensure_guild_icons(&self, guilds: Vec<GuildSummary>) -> Vec<GuildSummary> {
            self.seen.lock().push(guilds.clone());
            guilds
        }

        fn icon_path(&self, guild_id: &GuildId) -> PathBuf {
            PathBuf::from(IconCachePolicy::SUBDIRECTORY).join(IconCachePolicy::file_name(guild_id))
        }
    }
}
