//! Chat-completion HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::wire::WireMessage;

use super::error::{UpstreamError, UpstreamResult};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Fallback when the upstream reports an error without a message.
const GENERIC_API_ERROR: &str = "upstream completion API error";

/// Which model variant a request should run against. The caller picks
/// `Vision` when the outbound payload carries an image part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelHint {
    /// Default text model.
    Text,
    /// Vision-capable model variant.
    Vision,
}

/// Client for the upstream OpenAI-compatible completion API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    /// HTTP client.
    client: Client,
    /// Upstream endpoint, credential and model configuration.
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a new upstream client.
    pub fn new(config: UpstreamConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Whether an API credential is configured.
    pub fn has_credential(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    /// Resolve a model hint to the configured model identifier.
    fn model_for(&self, hint: ModelHint) -> &str {
        match hint {
            ModelHint::Text => &self.config.text_model,
            ModelHint::Vision => &self.config.vision_model,
        }
    }

    /// Issue one completion request and return the reply text.
    ///
    /// No retry is performed on failure; a retry policy, if desired, layers
    /// outside this call.
    pub async fn complete(
        &self,
        messages: &[WireMessage],
        hint: ModelHint,
    ) -> UpstreamResult<String> {
        if !self.has_credential() {
            return Err(UpstreamError::MissingCredential);
        }

        let model = self.model_for(hint);
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(model, message_count = messages.len(), "calling upstream");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            // Error bodies are best-effort JSON; fall back to the generic
            // message when the shape doesn't match.
            let message = serde_json::from_slice::<ChatCompletionResponse>(&bytes)
                .ok()
                .and_then(|body| body.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());
            return Err(UpstreamError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        if let Some(error) = completion.error {
            return Err(UpstreamError::Api {
                status: None,
                message: error.message.unwrap_or_else(|| GENERIC_API_ERROR.to_string()),
            });
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(UpstreamError::UnexpectedShape)
    }
}
