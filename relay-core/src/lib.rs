//! # relay-core
//!
//! Core types and traits for the channel relay: inbound messages, content kinds, delivery outcomes,
//! the error taxonomy, transport seams ([`Destination`], [`MediaFetcher`], [`ChannelDirectory`]) and
//! tracing initialization. Transport-agnostic; used by relay-pipeline and relay-telegram.

pub mod error;
pub mod locale;
pub mod logger;
pub mod secret;
pub mod transport;
pub mod types;

pub use error::{
    ClassifierError, ConfigError, DeliveryError, MediaError, RelayError, ValidationError,
};
pub use locale::Locale;
pub use logger::{init_tracing, level_directive};
pub use secret::mask_token;
pub use transport::{ChannelDirectory, Destination, MediaFetcher, ToInbound};
pub use types::{
    Attachment, ChannelInfo, ChannelRef, Content, ContentKind, DeliveryOutcome, InboundMessage,
    MediaBuffer, MediaMode, MediaPayload,
};
