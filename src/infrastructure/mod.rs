//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord API client.
pub mod discord;
/// Guild icon cache.
pub mod image;
/// Token storage adapters.
pub mod storage;
/// Hidden terminal input.
pub mod terminal;

pub use config::{AppConfig, CliArgs, Command, ConfigError, LogLevel, StorageManager};
pub use discord::{ApiTransport, DiscordClient, ReqwestHttp};
pub use image::GuildIconCache;
pub use storage::FileTokenStorage;
pub use terminal::read_secret;
