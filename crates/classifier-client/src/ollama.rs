//! Ollama `/api/generate` implementation of [`RelevanceClassifier`].

use async_trait::async_trait;
use relay_core::{ClassifierError, Locale};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::ClassifierConfig;
use crate::prompt::{build_prompt, is_affirmative};
use crate::{InterestProfile, RelevanceClassifier};

const LOG_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Classifier backed by an Ollama-compatible completion endpoint. One request per post, no retry.
#[derive(Debug, Clone)]
pub struct OllamaClassifier {
    client: Client,
    url: String,
    model: String,
    locale: Locale,
}

impl OllamaClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            locale: config.locale,
        })
    }

    /// Sends one classification request and parses the verdict.
    pub async fn try_classify(
        &self,
        text: &str,
        profile: &InterestProfile,
    ) -> Result<bool, ClassifierError> {
        let preview: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        info!(
            model = %self.model,
            text_preview = %preview,
            text_len = text.chars().count(),
            "Classifier request"
        );

        let prompt = build_prompt(text, profile, self.locale);
        let request = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::Protocol(format!("{}: {}", e, body)))?;

        let verdict = is_affirmative(&parsed.response, self.locale);
        info!(
            answer = %parsed.response.trim(),
            verdict,
            "Classifier response"
        );
        Ok(verdict)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClassifierError {
    if e.is_timeout() {
        ClassifierError::Timeout(e.to_string())
    } else {
        ClassifierError::Transport(e.to_string())
    }
}

#[async_trait]
impl RelevanceClassifier for OllamaClassifier {
    async fn classify(&self, text: &str, profile: &InterestProfile) -> bool {
        match self.try_classify(text, profile).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(error = %e, model = %self.model, "Classification failed, treating as not relevant");
                false
            }
        }
    }
}
