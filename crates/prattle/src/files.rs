//! Attachment admission and text extraction.
//!
//! Whitelist approach: only the MIME types we want to accept get through,
//! everything else is rejected before any session state is touched.

use bytes::Bytes;

/// Placeholder sent in place of PDF text until extraction is implemented.
const PDF_PLACEHOLDER: &str = "[PDF file uploaded - content extraction not implemented yet]";

/// A transient, validated file payload associated with exactly one turn.
/// Never stored in a session; exists only while the turn is constructed.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Original file name as uploaded.
    pub file_name: String,
    /// MIME type declared by the client.
    pub mime_type: String,
    /// Raw file bytes.
    pub bytes: Bytes,
}

/// Map a declared MIME type to its canonical allowed form, or `None` if the
/// type is not on the allow-list. `image/jpg` is a common client alias and
/// normalizes to `image/jpeg`.
pub fn canonical_mime_type(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "application/pdf" => Some("application/pdf"),
        "text/plain" => Some("text/plain"),
        "image/png" => Some("image/png"),
        "image/jpeg" | "image/jpg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Validate an attachment against the allow-list and the size cap.
///
/// Returns the canonical MIME type on success, or a caller-facing rejection
/// message. Runs before any SessionStore or UpstreamClient interaction.
pub fn validate(attachment: &Attachment, max_size_mb: u64) -> Result<&'static str, String> {
    let Some(mime_type) = canonical_mime_type(&attachment.mime_type) else {
        return Err(format!(
            "file type \"{}\" is not allowed. Accepted types: PDF, TXT, PNG, JPG",
            attachment.mime_type
        ));
    };

    let max_bytes = max_size_mb * 1024 * 1024;
    let actual = attachment.bytes.len() as u64;
    if actual > max_bytes {
        return Err(format!(
            "file exceeds the {max_size_mb}MB limit (actual: {:.2}MB)",
            actual as f64 / 1024.0 / 1024.0
        ));
    }

    Ok(mime_type)
}

/// Whether a canonical MIME type is an image (routed to the vision model).
pub fn is_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Extract inline text from a non-image attachment.
///
/// Plain text is decoded as UTF-8 (lossy); PDF content extraction is not
/// implemented and yields a placeholder.
pub fn extract_text(mime_type: &str, bytes: &[u8]) -> String {
    match mime_type {
        "text/plain" => String::from_utf8_lossy(bytes).into_owned(),
        "application/pdf" => PDF_PLACEHOLDER.to_string(),
        other => format!("[unsupported attachment type: {other}]"),
    }
}
