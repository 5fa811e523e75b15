//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// A chat message as delivered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: u64,
    pub user_id: String,
    pub user_name: String,
    pub room_id: String,
    pub text: String,
    /// RFC 3339, UTC
    pub created_at: String,
}
