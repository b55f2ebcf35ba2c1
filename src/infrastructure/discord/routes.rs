//! REST route paths, relative to the API origin.

use crate::domain::entities::{ChannelId, GuildId};

pub const LOGIN: &str = "auth/login";
pub const TOTP: &str = "auth/mfa/totp";
pub const GUILDS: &str = "users/@me/guilds";
pub const RELATIONSHIPS: &str = "users/@me/relationships";
pub const DM_CHANNELS: &str = "users/@me/channels";

pub fn guild_channels(guild_id: &GuildId) -> String {
    format!("guilds/{guild_id}/channels")
}

pub fn channel_messages(channel_id: &ChannelId) -> String {
    format!("channels/{channel_id}/messages")
}

pub fn typing(channel_id: &ChannelId) -> String {
    format!("channels/{channel_id}/typing")
}
