//! QTCord - session, authentication and REST layer of a lightweight Discord client.
//!
//! This crate implements token storage, an atomically updated request session,
//! email/password login with TOTP, message normalization and a guild icon
//! cache, organised as domain, application and infrastructure layers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "qtcord";
