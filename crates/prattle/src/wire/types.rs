//! Outbound message shapes for the chat-completion API.

use serde::{Deserialize, Serialize};

/// One message in the upstream `messages` array.
///
/// Constructed fresh on every outbound call, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Upstream role tag: `"system"`, `"user"` or `"assistant"`.
    pub role: String,
    /// Message content, either a plain string or an array of content parts.
    pub content: WireContent,
}

impl WireMessage {
    /// Create a string-content message.
    pub fn text(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: WireContent::Text(content.into()),
        }
    }
}

/// Message content: text-only models take a single string, vision-capable
/// models take an array of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
    /// Flat string content.
    Text(String),
    /// Multi-part content (text plus inline image).
    Parts(Vec<ContentPart>),
}

impl WireContent {
    /// The string content, if this is the flat shape.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WireContent::Text(text) => Some(text),
            WireContent::Parts(_) => None,
        }
    }
}

/// One element of a multi-part content array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text { text: String },
    /// An inline image carried as a data URI.
    ImageUrl { image_url: ImageUrl },
}

/// URL wrapper for an image content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_serializes_flat() {
        let msg = WireMessage::text("user", "hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_parts_message_serializes_array() {
        let msg = WireMessage {
            role: "user".to_string(),
            content: WireContent::Parts(vec![
                ContentPart::Text {
                    text: "describe this".to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/png;base64,AAAA".to_string(),
                    },
                },
            ]),
        };

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "describe this"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                ],
            })
        );
    }
}
