//! Request/response types for the chat-completion endpoint.

use serde::{Deserialize, Serialize};

use crate::wire::WireMessage;

/// Outbound chat-completion request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    /// Model identifier to run the completion against.
    pub model: &'a str,
    /// Full conversation in upstream wire shape.
    pub messages: &'a [WireMessage],
    /// Sampling temperature (fixed configuration constant).
    pub temperature: f32,
    /// Completion token cap (fixed configuration constant).
    pub max_tokens: u32,
}

/// Chat-completion response body.
///
/// Error bodies share this shape: upstreams put an `error` object beside (or
/// instead of) `choices`, so both fields are optional here and the client
/// decides which path applies.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub error: Option<ApiErrorDetail>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The message inside a completion choice.
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

/// Error object reported by the upstream.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
}
