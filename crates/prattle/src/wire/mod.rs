//! Upstream wire format and history translation.
//!
//! The internal conversation representation (`session::Turn`) and the
//! upstream chat-completion representation are two different shapes. This
//! module is the single place the two meet: `types` defines the outbound
//! message shapes bit-exactly, and `adapter` holds the pure translation
//! functions. Nothing outside this module constructs wire messages.

mod adapter;
mod types;

pub use adapter::{append_extracted_text, attach_image_to_last_message, to_wire_format};
pub use types::{ContentPart, ImageUrl, WireContent, WireMessage};
