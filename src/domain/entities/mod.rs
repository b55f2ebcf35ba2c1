//! Domain entity definitions.

mod channel;
mod guild;
mod login;
mod message;
mod token;
mod user;

pub use channel::ChannelId;
pub use guild::{GuildId, GuildSummary};
pub use login::{LoginFailure, LoginOutcome, LoginTicket, UNSUPPORTED_CHALLENGE_DIAGNOSTIC};
pub use message::{
    EMPTY_CONTENT_PLACEHOLDER, ERROR_MESSAGE_ID, FETCH_ERROR_CONTENT, NormalizedMessage,
    RawAuthor, RawMessage, SYSTEM_AUTHOR,
};
pub use token::AuthToken;
pub use user::UserId;
