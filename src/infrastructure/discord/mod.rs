//! Discord REST API client.

mod client;
mod dto;
mod http;
mod routes;
mod transport;

pub use client::DiscordClient;
pub use http::ReqwestHttp;
pub use transport::ApiTransport;
