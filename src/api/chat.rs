//! Chat-group link API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{ChatLink, UpdateChatLinkRequest};
use crate::AppState;

/// GET /api/chat-link - Read the chat-group invite link.
pub async fn get_chat_link(State(state): State<AppState>) -> ApiResult<ChatLink> {
    success(state.content.chat_link().await)
}

/// PUT /api/admin/chat-link - Replace the chat-group invite link.
pub async fn update_chat_link(
    State(state): State<AppState>,
    Json(request): Json<UpdateChatLinkRequest>,
) -> ApiResult<ChatLink> {
    let chat = state.content.set_chat_link(request.link).await?;
    success(chat)
}
