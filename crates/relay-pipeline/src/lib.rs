//! # relay-pipeline
//!
//! The message relay pipeline: relevance gate, content resolution, source attribution,
//! tiered delivery, channel validation and per-channel relay queues.
//!
//! Transport-agnostic: talks to the platform only through the relay-core traits.

pub mod attribution;
pub mod caption;
pub mod dispatcher;
pub mod pipeline;
pub mod queue;
pub mod resolver;
pub mod stats;
pub mod validator;

pub use attribution::{attribute, display_name, message_link, Attribution};
pub use caption::{CaptionFormatter, MAX_CAPTION_CHARS, MAX_TEXT_CHARS};
pub use dispatcher::RelayDispatcher;
pub use pipeline::RelayPipeline;
pub use queue::RelayQueue;
pub use resolver::{content_kind, select_attachment, ContentResolver};
pub use stats::{RelayStats, StatsSnapshot};
pub use validator::{validate_channels, MonitoredChannels, ValidationReport};
