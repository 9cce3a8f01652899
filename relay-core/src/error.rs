//! Error taxonomy. Only [`ConfigError`] is fatal; everything else is handled inside the
//! per-message pipeline or per-channel validation and never stops the process.

use thiserror::Error;

use crate::types::ContentKind;

/// Configuration load/parse failure. The binary exits with status 1.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// A configured source channel could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Channel {channel} does not exist or the handle is invalid: {reason}")]
    NotFound { channel: String, reason: String },

    #[error("Channel {channel} is not reachable: {reason}")]
    Unreachable { channel: String, reason: String },

    #[error("Ingesting bot is not an administrator of channel {channel}; its posts would never arrive")]
    NotAdmin { channel: String },

    #[error("None of the {attempted} configured channels could be validated")]
    NoValidChannels { attempted: usize },
}

/// Classification request failed. Callers fail closed (verdict `false`).
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier transport error: {0}")]
    Transport(String),

    #[error("Classifier request timed out: {0}")]
    Timeout(String),

    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Classifier protocol error: {0}")]
    Protocol(String),
}

/// Media could not be prepared for re-upload. Triggers the text fallback tier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Failed to download media {file_id}: {reason}")]
    Download { file_id: String, reason: String },

    #[error("Downloaded media {file_id} is empty")]
    Empty { file_id: String },
}

/// The destination rejected or never received an outbound call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Destination rejected the request: {0}")]
    Rejected(String),

    #[error("Network error while delivering: {0}")]
    Network(String),

    #[error("Delivery failed: {0}")]
    Other(String),
}

/// Terminal per-message failure. Nothing reached the destination channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Relay of {kind} content suppressed: {cause}")]
    Suppressed { kind: ContentKind, cause: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressed_message_names_kind_and_cause() {
        let err = RelayError::Suppressed {
            kind: ContentKind::Video,
            cause: "no text to fall back to".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Relay of video content suppressed: no text to fall back to"
        );
    }

    #[test]
    fn test_classifier_status_display() {
        let err = ClassifierError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Classifier returned HTTP 502: bad gateway");
    }
}
