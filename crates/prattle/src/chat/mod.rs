//! Conversation orchestration module.
//!
//! Ties the session store, the wire adapter and the upstream client together
//! for the two supported interaction shapes: a text-only turn and a turn
//! with one attached file.

mod error;
mod service;

pub use error::{ChatError, ChatResult};
pub use service::ConversationService;
