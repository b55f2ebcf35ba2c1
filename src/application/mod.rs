//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Login state machine and chat operations.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse, TokenSource};
pub use services::{ChatService, LoginFlow, LoginState};
pub use use_cases::{LoginUseCase, ResolveTokenUseCase, ResolvedToken};
