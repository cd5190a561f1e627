//! API request handlers.

use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::files::Attachment;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Success envelope: `{success: true, data: ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Request body for a text turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Reply payload for a text turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatData {
    pub message: String,
    pub role: String,
    pub session_id: String,
}

/// Run one text-only conversational turn.
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ApiResponse<ChatData>>> {
    let reply = state
        .chat
        .text_turn(&request.session_id, &request.message)
        .await?;

    Ok(Json(ApiResponse::ok(ChatData {
        message: reply,
        role: "assistant".to_string(),
        session_id: request.session_id,
    })))
}

/// Reply payload for a file turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChatData {
    pub message: String,
    pub role: String,
    pub session_id: String,
    pub file_name: String,
}

/// Run one conversational turn carrying a single file attachment.
///
/// Multipart form fields: `sessionId`, optional `message`, and one `file`
/// part whose content type drives admission and model selection.
pub async fn chat_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ApiResponse<FileChatData>>> {
    let mut session_id: Option<String> = None;
    let mut message: Option<String> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("sessionId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid sessionId field: {e}")))?;
                session_id = Some(value);
            }
            Some("message") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("invalid message field: {e}")))?;
                message = Some(value);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("attachment").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read file part: {e}")))?;
                attachment = Some(Attachment {
                    file_name,
                    mime_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let session_id =
        session_id.ok_or_else(|| ApiError::bad_request("sessionId is required"))?;
    let attachment =
        attachment.ok_or_else(|| ApiError::bad_request("no file attachment found"))?;
    let file_name = attachment.file_name.clone();

    info!(session_id = %session_id, file = %file_name, "file turn received");

    let reply = state
        .chat
        .file_turn(&session_id, message.as_deref(), attachment)
        .await?;

    Ok(Json(ApiResponse::ok(FileChatData {
        message: reply,
        role: "assistant".to_string(),
        session_id,
        file_name,
    })))
}

/// Request body for a history reset.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryRequest {
    pub session_id: String,
}

/// Reply payload for a history reset.
#[derive(Debug, Serialize)]
pub struct ClearHistoryData {
    pub message: String,
}

/// Discard a session's history and reinitialize it to the baseline.
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn clear_history(
    State(state): State<AppState>,
    Json(request): Json<ClearHistoryRequest>,
) -> ApiResult<Json<ApiResponse<ClearHistoryData>>> {
    state.chat.clear(&request.session_id)?;

    Ok(Json(ApiResponse::ok(ClearHistoryData {
        message: "History cleared. You can start a new conversation.".to_string(),
    })))
}
