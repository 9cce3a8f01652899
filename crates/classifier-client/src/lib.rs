//! # classifier-client
//!
//! Relevance classification of channel posts against a set of interest topics.
//!
//! [`RelevanceClassifier`] is the seam used by the relay pipeline; [`OllamaClassifier`] implements
//! it against an Ollama-compatible `/api/generate` endpoint. Classification fails closed: any
//! transport, status or protocol error yields `false`.

mod config;
mod ollama;
mod prompt;

use async_trait::async_trait;

pub use config::ClassifierConfig;
pub use ollama::OllamaClassifier;
pub use prompt::{build_prompt, is_affirmative};

/// Topics a post must match to be relayed. Shared read-only by all relay workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestProfile {
    pub topics: Vec<String>,
    /// Ask the model to reject advertising and promotional posts.
    pub exclude_promotional: bool,
}

impl InterestProfile {
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            exclude_promotional: true,
        }
    }

    pub fn with_exclude_promotional(mut self, exclude: bool) -> Self {
        self.exclude_promotional = exclude;
        self
    }
}

/// Decides whether a text matches an interest profile.
///
/// Callers short-circuit empty text; implementations may assume `text` is non-blank.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn classify(&self, text: &str, profile: &InterestProfile) -> bool;
}
