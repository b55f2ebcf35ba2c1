//! Application services.

mod chat_service;
mod login_flow;

pub use chat_service::ChatService;
pub use login_flow::{LoginFlow, LoginState};
