//! Discord CDN URLs.

use crate::domain::entities::GuildId;
use crate::domain::ports::IconCachePolicy;

/// Default CDN origin.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com";

/// Builds the URL of a guild icon from its icon hash.
#[must_use]
pub fn guild_icon_url(cdn_base: &str, guild_id: &GuildId, icon_hash: &str) -> String {
    format!(
        "{}/icons/{guild_id}/{icon_hash}.{}",
        cdn_base.trim_end_matches('/'),
        IconCachePolicy::EXTENSION
    )
}
