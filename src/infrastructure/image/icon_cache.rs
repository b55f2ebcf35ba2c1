//! On-disk cache of guild icons.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use super::discord_cdn::{DEFAULT_CDN_BASE, guild_icon_url};
use crate::domain::entities::{GuildId, GuildSummary};
use crate::domain::ports::{
    CacheError, CacheResult, HttpPort, HttpRequest, IconCachePolicy, IconCachePort,
    USER_AGENT_HEADER,
};
use crate::domain::session::DEFAULT_USER_AGENT;

/// What happened to one guild's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconFetch {
    AlreadyCached,
    Downloaded,
    NotFound,
}

/// Downloads guild icons from the CDN into `<root>/servers/{id}.png`.
///
/// An icon that exists on disk is never fetched again.
pub struct GuildIconCache {
    http: Arc<dyn HttpPort>,
    cdn_base: String,
    user_agent: String,
    cache_dir: PathBuf,
}

impl GuildIconCache {
    /// Creates a cache under `cache_root` using the default CDN.
    #[must_use]
    pub fn new(http: Arc<dyn HttpPort>, cache_root: impl AsRef<Path>) -> Self {
        Self {
            http,
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_dir: cache_root.as_ref().join(IconCachePolicy::SUBDIRECTORY),
        }
    }

    /// Overrides the CDN origin.
    #[must_use]
    pub fn with_cdn_base(mut self, cdn_base: impl Into<String>) -> Self {
        self.cdn_base = cdn_base.into();
        self
    }

    /// Overrides the User-Agent sent to the CDN.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Directory holding the cached icons.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    async fn ensure_icon(&self, guild_id: &GuildId, icon_hash: &str) -> CacheResult<IconFetch> {
        let path = self.icon_path(guild_id);
        if fs::try_exists(&path).await.unwrap_or(false) {
            trace!(%guild_id, "Icon already cached");
            return Ok(IconFetch::AlreadyCached);
        }

        let url = guild_icon_url(&self.cdn_base, guild_id, icon_hash);
        let request =
            HttpRequest::get(url).with_header(USER_AGENT_HEADER, self.user_agent.as_str());

        let response = self
            .http
            .send(request)
            .await
            .map_err(|e| CacheError::NetworkError(e.to_string()))?;

        match response.status {
            404 => return Ok(IconFetch::NotFound),
            status if !(200..300).contains(&status) => {
                return Err(CacheError::UnexpectedStatus(status));
            }
            _ => {}
        }

        self.write_icon(&path, &response.body).await?;
        debug!(%guild_id, path = %path.display(), size = response.body.len(), "Cached guild icon");
        Ok(IconFetch::Downloaded)
    }

    async fn write_icon(&self, path: &Path, bytes: &[u8]) -> CacheResult<()> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        let mut partial = path.as_os_str().to_owned();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let mut file = fs::File::create(&partial)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to create cache file: {e}")))?;

        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

        file.flush()
            .await
            .map_err(|e| CacheError::IoError(format!("Failed to flush cache file: {e}")))?;
        drop(file);

        if let Err(e) = fs::rename(&partial, path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(CacheError::IoError(format!("Failed to move cache file: {e}")));
        }

        Ok(())
    }
}

#[async_trait]
impl IconCachePort for GuildIconCache {
    async fn ensure_guild_icons(&self, guilds: Vec<GuildSummary>) -> Vec<GuildSummary> {
        let mut downloaded = 0usize;

        for guild in &guilds {
            let (Some(guild_id), Some(icon_hash)) = (guild.id(), guild.icon()) else {
                continue;
            };

            match self.ensure_icon(&guild_id, icon_hash).await {
                Ok(IconFetch::Downloaded) => downloaded += 1,
                Ok(IconFetch::AlreadyCached) => {}
                Ok(IconFetch::NotFound) => {
                    trace!(%guild_id, "Guild icon not on CDN");
                }
                Err(e) => {
                    warn!(%guild_id, error = %e, "Failed to cache guild icon");
                }
            }
        }

        debug!(guilds = guilds.len(), downloaded, "Guild icons checked");
        guilds
    }

    fn icon_path(&self, guild_id: &GuildId) -> PathBuf {
        self.cache_dir.join(IconCachePolicy::file_name(guild_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ApiError;
    use crate::domain::ports::HttpResponse;
    use crate::domain::ports::mocks::MockHttpPort;
    use serde_json::json;
    use tempfile::TempDir;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    fn guild(id: &str, icon: Option<&str>) -> GuildSummary {
        GuildSummary::from_raw(json!({"id": id, "name": format!("guild {id}"), "icon": icon}))
    }

    fn cache(http: MockHttpPort, root: &TempDir) -> GuildIconCache {
        GuildIconCache::new(Arc::new(http), root.path())
            .with_cdn_base("https://cdn.test")
            .with_user_agent("test-agent")
    }

    #[tokio::test]
    async fn test_downloads_missing_icon() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send()
            .withf(|req: &HttpRequest| {
                req.url == "https://cdn.test/icons/1/abc.png"
                    && req.header(USER_AGENT_HEADER) == Some("test-agent")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, PNG.to_vec())));

        let cache = cache(http, &root);
        let guilds = vec![guild("1", Some("abc"))];
        let returned = cache.ensure_guild_icons(guilds.clone()).await;

        assert_eq!(returned, guilds);
        let written = std::fs::read(root.path().join("servers").join("1.png")).unwrap();
        assert_eq!(written, PNG);
        assert!(!root.path().join("servers").join("1.png.part").exists());
    }

    #[tokio::test]
    async fn test_second_listing_does_not_refetch() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, PNG.to_vec())));

        let cache = cache(http, &root);
        cache.ensure_guild_icons(vec![guild("1", Some("abc"))]).await;
        cache.ensure_guild_icons(vec![guild("1", Some("abc"))]).await;
    }

    #[tokio::test]
    async fn test_guild_without_icon_never_fetches() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send().never();

        let cache = cache(http, &root);
        let guilds = vec![guild("1", None), guild("2", Some(""))];
        let returned = cache.ensure_guild_icons(guilds.clone()).await;

        assert_eq!(returned, guilds);
        assert!(!root.path().join("servers").exists());
    }

    #[tokio::test]
    async fn test_path_like_guild_id_is_never_cached() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send().never();

        let cache = cache(http, &root);
        let guilds = vec![guild("../../escaped", Some("abc"))];
        let returned = cache.ensure_guild_icons(guilds.clone()).await;

        assert_eq!(returned, guilds);
        assert!(!cache.cache_dir().exists());
        assert!(!root.path().join("escaped.png").exists());
    }

    #[tokio::test]
    async fn test_missing_icon_on_cdn_is_skipped() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(404, "{\"message\": \"404: Not Found\"}")));

        let cache = cache(http, &root);
        cache.ensure_guild_icons(vec![guild("1", Some("gone"))]).await;

        assert!(!cache.icon_path(&GuildId::new("1")).exists());
    }

    #[tokio::test]
    async fn test_server_error_writes_nothing() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(500, "oops")));

        let cache = cache(http, &root);
        cache.ensure_guild_icons(vec![guild("1", Some("abc"))]).await;

        assert!(!cache.icon_path(&GuildId::new("1")).exists());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_listing_in_order() {
        let root = TempDir::new().unwrap();
        let mut http = MockHttpPort::new();
        http.expect_send()
            .withf(|req: &HttpRequest| req.url.contains("/icons/1/"))
            .times(1)
            .returning(|_| Err(ApiError::network("connection reset")));
        http.expect_send()
            .withf(|req: &HttpRequest| req.url.contains("/icons/2/"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, PNG.to_vec())));

        let cache = cache(http, &root);
        let guilds = vec![guild("1", Some("a")), guild("2", Some("b"))];
        let returned = cache.ensure_guild_icons(guilds.clone()).await;

        assert_eq!(returned, guilds);
        assert!(!cache.icon_path(&GuildId::new("1")).exists());
        assert!(cache.icon_path(&GuildId::new("2")).exists());
    }

    #[test]
    fn test_icon_path_layout() {
        let root = TempDir::new().unwrap();
        let cache = GuildIconCache::new(Arc::new(MockHttpPort::new()), root.path());

        assert_eq!(cache.cache_dir(), root.path().join("servers"));
        assert_eq!(
            cache.icon_path(&GuildId::new("42")),
            root.path().join("servers").join("42.png")
        );
    }
}
