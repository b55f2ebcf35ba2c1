//! Guild icon caching.

pub mod discord_cdn;
mod icon_cache;

pub use discord_cdn::{DEFAULT_CDN_BASE, guild_icon_url};
pub use icon_cache::GuildIconCache;
