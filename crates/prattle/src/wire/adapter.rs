//! Pure translation from conversation history to the upstream wire shape.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::session::Turn;

use super::types::{ContentPart, ImageUrl, WireContent, WireMessage};

/// Label prefixed to inlined file content (non-image attachments).
const FILE_CONTENT_LABEL: &str = "[File Content]:";

/// Translate a conversation history into the upstream `messages` array.
///
/// Deterministic and pure: N turns yield exactly N messages in order. Each
/// turn's text blocks are joined with a newline into one string per message.
/// The internal role names meet the upstream role tags here and nowhere else.
pub fn to_wire_format(history: &[Turn]) -> Vec<WireMessage> {
    history
        .iter()
        .map(|turn| WireMessage::text(turn.role.to_string(), turn.joined_text()))
        .collect()
}

/// Replace the final message's string content with a two-part structure: the
/// original text followed by an inline image carried as a base64 data URI.
///
/// Precondition: the final message still carries string content. Callers
/// guard this by building the wire list fresh from text-only history before
/// attaching; a message that is already multi-part is left untouched.
pub fn attach_image_to_last_message(
    mut messages: Vec<WireMessage>,
    image_bytes: &[u8],
    mime_type: &str,
) -> Vec<WireMessage> {
    if let Some(last) = messages.last_mut() {
        if let WireContent::Text(text) = &last.content {
            let data_url = format!("data:{};base64,{}", mime_type, BASE64.encode(image_bytes));
            last.content = WireContent::Parts(vec![
                ContentPart::Text { text: text.clone() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_url },
                },
            ]);
        } else {
            debug_assert!(false, "last wire message already carries parts content");
        }
    }
    messages
}

/// Append a labeled block of extracted file text to the final message's
/// string content. Used for non-image attachments so text-only models keep
/// receiving a single string.
pub fn append_extracted_text(
    mut messages: Vec<WireMessage>,
    extracted_text: &str,
) -> Vec<WireMessage> {
    if let Some(last) = messages.last_mut() {
        if let WireContent::Text(text) = &last.content {
            last.content = WireContent::Text(format!(
                "{text}\n\n{FILE_CONTENT_LABEL}\n{extracted_text}"
            ));
        } else {
            debug_assert!(false, "last wire message already carries parts content");
        }
    }
    messages
}
