//! In-memory session store.
//!
//! Maps opaque client-supplied session identifiers to ordered conversation
//! histories. Sessions are created lazily on first reference and live for
//! the lifetime of the process; there is no eviction policy, so memory use
//! grows with the number of distinct identifiers seen. This is a documented
//! limitation of the in-memory design.
//!
//! The store treats identifiers as opaque keys: it has no concept of an
//! "invalid" session id. Rejecting empty or malformed identifiers is the
//! caller's responsibility.

use dashmap::DashMap;

use super::models::{Role, Turn};

/// Instructions injected as the first turn of every session.
pub const SYSTEM_PROMPT: &str = "You are a knowledgeable, friendly assistant.\n\
Answer in the language the user writes in.\n\
Give clear, direct, useful answers.\n\
If you are not sure about something, say so plainly instead of fabricating details.";

/// Greeting injected as the second turn of every session.
pub const ASSISTANT_GREETING: &str =
    "Hello! I'm ready to help. What would you like to know?";

/// Owns the process-wide map from session identifier to conversation history.
///
/// The underlying container is never exposed; all mutation goes through the
/// three operations below. Turn alternation (user, assistant, user, ...) is a
/// relaxed invariant: the store does not enforce it, and a history may end
/// with an unanswered user turn after a failed upstream call.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Vec<Turn>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// The two-turn baseline every session starts from.
    fn baseline() -> Vec<Turn> {
        vec![
            Turn::text(Role::System, SYSTEM_PROMPT),
            Turn::text(Role::Assistant, ASSISTANT_GREETING),
        ]
    }

    /// Return the history for `session_id`, initializing it with the
    /// synthesized baseline on first access. Never returns an empty history.
    pub fn get_or_create(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(Self::baseline)
            .clone()
    }

    /// Append one turn to the addressed session, creating the session first
    /// if absent. Returns the full updated history.
    pub fn append(&self, session_id: &str, role: Role, content: impl Into<String>) -> Vec<Turn> {
        let mut history = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(Self::baseline);
        history.push(Turn::text(role, content));
        history.clone()
    }

    /// Discard any existing history for `session_id` and reinitialize it to
    /// the synthesized baseline, returning the fresh history.
    pub fn clear(&self, session_id: &str) -> Vec<Turn> {
        let fresh = Self::baseline();
        self.sessions.insert(session_id.to_string(), fresh.clone());
        fresh
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
