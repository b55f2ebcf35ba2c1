mod auth_port;
mod discord_data_port;
mod http_port;
mod icon_cache_port;
mod token_storage_port;

pub use auth_port::AuthPort;
pub use discord_data_port::{
    DiscordDataPort, FetchMessagesOptions, MAX_MESSAGE_LIMIT, SendMessageRequest,
};
pub use http_port::{
    AUTHORIZATION_HEADER, HttpMethod, HttpPort, HttpRequest, HttpResponse, USER_AGENT_HEADER,
};
pub use icon_cache_port::{CacheError, CacheResult, IconCachePolicy, IconCachePort};
pub use token_storage_port::TokenStoragePort;
