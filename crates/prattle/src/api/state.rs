//! Application state shared across handlers.

use std::sync::Arc;

use crate::chat::ConversationService;
use crate::config::{AppConfig, LimitsConfig, ServerConfig};
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversation service orchestrating sessions and upstream calls.
    pub chat: Arc<ConversationService>,
    /// Server configuration (CORS origins, bind address).
    pub server: ServerConfig,
    /// Request-size limits (drives the multipart body cap).
    pub limits: LimitsConfig,
}

impl AppState {
    /// Create new application state from resolved configuration.
    pub fn new(config: AppConfig) -> Self {
        let client = UpstreamClient::new(config.upstream);
        let chat = ConversationService::new(client, config.limits.clone(), config.chat);

        Self {
            chat: Arc::new(chat),
            server: config.server,
            limits: config.limits,
        }
    }
}
