//! # relay-telegram
//!
//! Telegram transport for the relay: update adapters, [`relay_core::Destination`],
//! [`relay_core::MediaFetcher`] and [`relay_core::ChannelDirectory`] implementations over teloxide,
//! operator commands, and the dispatcher runner. No relay logic lives here.

mod adapters;
mod bot_adapter;
mod commands;
mod config;
mod directory;
mod fetcher;
mod runner;

pub use adapters::{TelegramChatWrapper, TelegramMessageWrapper};
pub use bot_adapter::{input_file, map_request_error, TelegramDestination};
pub use commands::{reply_for, Command};
pub use config::TelegramConfig;
pub use directory::{recipient, TelegramDirectory};
pub use fetcher::{TelegramMediaFetcher, MAX_DOWNLOAD_BYTES};
pub use runner::{combined_handler, command_branch, ingest_branch, run_dispatcher};
