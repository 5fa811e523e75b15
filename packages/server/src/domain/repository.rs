//! Persistence port.
//!
//! The relational store behind this trait is an external collaborator; the
//! core only needs room lookup, message insert and the recent-history read.
//! Implementations report failures as [`RepositoryError`] and the core never
//! retries them.

use async_trait::async_trait;

use super::{ChatMessage, MessageId, NewChatMessage, RepositoryError, Room, RoomId};

/// Number of messages replayed to a client when it joins a room
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Look a room up by id; `Ok(None)` when it does not exist
    async fn get_room_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// List every room
    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError>;

    /// Insert a message and return the id assigned to it
    async fn add_message(&self, message: NewChatMessage) -> Result<MessageId, RepositoryError>;

    /// The most recent `limit` messages of a room, ordered oldest to newest
    async fn recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    async fn room_exists(&self, room_id: &RoomId) -> Result<bool, RepositoryError> {
        Ok(self.get_room_by_id(room_id).await?.is_some())
    }
}
