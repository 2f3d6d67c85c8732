//! Chat-group invite link model.

use serde::{Deserialize, Serialize};

/// The single chat-group invite link, overwritten in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLink {
    pub link: String,
}

/// Request body for replacing the chat-group link.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChatLinkRequest {
    pub link: String,
}
