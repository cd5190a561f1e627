//! Conversation data models.

use serde::{Deserialize, Serialize};

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Synthesized instructions turn, always first in a session.
    System,
    /// A message submitted by the client.
    User,
    /// A reply produced by the upstream model.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One role-tagged message unit within a session.
///
/// A turn holds one or more text blocks. Attachments are never stored here;
/// they exist only while the outbound wire payload for a single turn is
/// being built.
///
/// Turns are immutable once appended. Histories are append-only: individual
/// turns are never edited or removed, only the whole session can be reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// Ordered text blocks making up the turn's content.
    pub blocks: Vec<String>,
}

impl Turn {
    /// Create a single-block text turn.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            blocks: vec![content.into()],
        }
    }

    /// All blocks joined with a newline separator.
    pub fn joined_text(&self) -> String {
        self.blocks.join("\n")
    }
}
