//! Conversation service.
//!
//! Per-turn flow: validate → append the user turn → translate the history to
//! the wire shape → call upstream → append the assistant reply. No step is
//! retried internally. Validation failures leave the history untouched; an
//! upstream failure leaves the user turn appended with no paired reply,
//! which a subsequent turn simply appends after.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::config::{ChatConfig, LimitsConfig};
use crate::files::{self, Attachment};
use crate::session::{Role, SessionStore, Turn};
use crate::upstream::{ModelHint, UpstreamClient};
use crate::wire;

use super::error::{ChatError, ChatResult};

/// Orchestrates session history, wire translation and the upstream call for
/// one conversational turn at a time.
pub struct ConversationService {
    /// Session histories, owned exclusively by the store.
    store: SessionStore,
    /// Upstream completion client.
    client: UpstreamClient,
    /// Attachment admission limits.
    limits: LimitsConfig,
    /// Whether concurrent turns on one session are serialized.
    serialize_turns: bool,
    /// Per-session turn locks, populated lazily when serialization is on.
    turn_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ConversationService {
    /// Create a new conversation service.
    pub fn new(client: UpstreamClient, limits: LimitsConfig, chat: ChatConfig) -> Self {
        Self {
            store: SessionStore::new(),
            client,
            limits,
            serialize_turns: chat.serialize_turns,
            turn_locks: DashMap::new(),
        }
    }

    /// Run one text-only turn and return the assistant's reply.
    pub async fn text_turn(&self, session_id: &str, message: &str) -> ChatResult<String> {
        let session_id = validate_session_id(session_id)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::Validation("message is empty".to_string()));
        }

        let _guard = self.turn_guard(session_id).await;

        let history = self.store.append(session_id, Role::User, message);
        let messages = wire::to_wire_format(&history);
        let reply = self.client.complete(&messages, ModelHint::Text).await?;
        self.store.append(session_id, Role::Assistant, reply.clone());

        info!(session_id, turns = history.len() + 1, "text turn completed");
        Ok(reply)
    }

    /// Run one turn carrying a single file attachment and return the
    /// assistant's reply.
    ///
    /// The attachment is validated before any history mutation. Image
    /// attachments are inlined as a data URI and routed to the vision model;
    /// other allowed types are inlined as extracted text and routed to the
    /// default text model.
    pub async fn file_turn(
        &self,
        session_id: &str,
        message: Option<&str>,
        attachment: Attachment,
    ) -> ChatResult<String> {
        let session_id = validate_session_id(session_id)?;
        let mime_type = files::validate(&attachment, self.limits.max_file_size_mb)
            .map_err(ChatError::Validation)?;

        let user_text = match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(text) => text.to_string(),
            None => format!(
                "Please read the file \"{}\" and summarize its key points.",
                attachment.file_name
            ),
        };

        let _guard = self.turn_guard(session_id).await;

        let history = self.store.append(session_id, Role::User, user_text);
        let messages = wire::to_wire_format(&history);

        let reply = if files::is_image(mime_type) {
            debug!(session_id, mime_type, "attaching image to outbound turn");
            let messages =
                wire::attach_image_to_last_message(messages, &attachment.bytes, mime_type);
            self.client.complete(&messages, ModelHint::Vision).await?
        } else {
            let extracted = files::extract_text(mime_type, &attachment.bytes);
            let messages = wire::append_extracted_text(messages, &extracted);
            self.client.complete(&messages, ModelHint::Text).await?
        };

        self.store.append(session_id, Role::Assistant, reply.clone());

        info!(session_id, file = %attachment.file_name, "file turn completed");
        Ok(reply)
    }

    /// Reset a session to the synthesized two-turn baseline.
    pub fn clear(&self, session_id: &str) -> ChatResult<Vec<Turn>> {
        let session_id = validate_session_id(session_id)?;
        let history = self.store.clear(session_id);
        info!(session_id, "session history cleared");
        Ok(history)
    }

    /// Current history for a session (creating it on first reference).
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.store.get_or_create(session_id)
    }

    /// Acquire the per-session turn lock when serialization is enabled.
    ///
    /// Off by default: two concurrent turns on one session may interleave
    /// their appends, which the baseline design tolerates.
    async fn turn_guard(&self, session_id: &str) -> Option<OwnedMutexGuard<()>> {
        if !self.serialize_turns {
            return None;
        }
        let lock = self
            .turn_locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Some(lock.lock_owned().await)
    }
}

/// Session identifiers are opaque, but an empty one is a caller mistake.
fn validate_session_id(session_id: &str) -> Result<&str, ChatError> {
    let trimmed = session_id.trim();
    if trimmed.is_empty() {
        warn!("rejected turn with empty session identifier");
        return Err(ChatError::Validation(
            "sessionId must be a non-empty string".to_string(),
        ));
    }
    Ok(trimmed)
}
