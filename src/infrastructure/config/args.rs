use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "qtcord",
    version,
    about = "Lightweight Discord client: login, guilds, channels and messages",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Session token to use when none is stored.
    #[arg(long, env = "QTCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// REST API origin.
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in with email and password.
    Login {
        /// Account email; prompted for when omitted.
        #[arg(long)]
        email: Option<String>,

        /// Keep the token for this run only.
        #[arg(long)]
        no_persist: bool,
    },
    /// Forget the stored token.
    Logout,
    /// List guilds and cache their icons.
    Guilds,
    /// List the channels of a guild.
    Channels {
        /// Guild ID.
        guild: String,
    },
    /// Show recent messages of a channel, oldest first.
    Messages {
        /// Channel ID.
        channel: String,

        /// Number of messages (1 to 100).
        #[arg(long)]
        limit: Option<u8>,

        /// Only messages before this message ID.
        #[arg(long)]
        before: Option<String>,
    },
    /// Send a message to a channel.
    Send {
        /// Channel ID.
        channel: String,

        /// Message text.
        text: String,
    },
    /// Show the typing indicator in a channel.
    Typing {
        /// Channel ID.
        channel: String,
    },
    /// List relationships.
    Friends,
    /// Open (or find) the DM channel with a user.
    Dm {
        /// User ID.
        user: String,
    },
}
