//! Domain services.

pub mod message_normalizer;

pub use message_normalizer::{extract_channel_id, normalize_friends, normalize_messages};
