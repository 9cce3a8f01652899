//! # news_relay_bot
//!
//! Binary support: JSON config, CLI, lifecycle coordination and pipeline assembly.
//! **Public API:** `run_relay`, `check_channels`, `classify_once`.

mod assembly;
pub mod cli;
pub mod config;
mod facade;
pub mod lifecycle;

pub use assembly::heartbeat;
pub use cli::{Cli, Commands};
pub use config::{RelayConfig, DEFAULT_CONFIG_PATH};
pub use facade::*;
pub use lifecycle::Lifecycle;
