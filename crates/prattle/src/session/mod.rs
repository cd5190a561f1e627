//! Session management module.
//!
//! Owns the per-session conversation history: lazy creation with a
//! synthesized baseline, append-only turns, and whole-session reset.

mod models;
mod store;

pub use models::{Role, Turn};
pub use store::{ASSISTANT_GREETING, SYSTEM_PROMPT, SessionStore};
