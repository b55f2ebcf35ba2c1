//! Domain layer with core entities, session state and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Response normalization.
pub mod services;
/// Session state and derived request headers.
pub mod session;

pub use entities::{AuthToken, LoginOutcome};
pub use errors::{ApiError, AuthError};
pub use ports::{AuthPort, DiscordDataPort, HttpPort, IconCachePort, TokenStoragePort};
pub use session::{RequestContext, SessionState};
