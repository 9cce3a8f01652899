//! Classifier endpoint configuration.

use std::time::Duration;

use relay_core::Locale;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Full URL of the generate endpoint, e.g. `http://localhost:11434/api/generate`.
    pub url: String,
    pub model: String,
    pub timeout: Duration,
    pub locale: Locale,
}

impl ClassifierConfig {
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
