//! Domain entities: rooms, users and chat messages.

use super::value_object::{MessageId, MessageText, RoomId, Timestamp, UserId, UserName};

/// A named chat channel, created administratively and immutable afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Identity of a message author (a connected user or the quote bot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: UserId,
    pub name: UserName,
}

impl ChatUser {
    pub fn new(id: UserId, name: UserName) -> Self {
        Self { id, name }
    }
}

/// A message that has not been persisted yet and therefore has no id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub author: ChatUser,
    pub room_id: RoomId,
    pub text: MessageText,
    pub created_at: Timestamp,
}

impl NewChatMessage {
    pub fn new(author: ChatUser, room_id: RoomId, text: MessageText, created_at: Timestamp) -> Self {
        Self {
            author,
            room_id,
            text,
            created_at,
        }
    }

    /// Attach the id assigned by persistence
    pub fn persisted(self, id: MessageId) -> ChatMessage {
        ChatMessage {
            id,
            author: self.author,
            room_id: self.room_id,
            text: self.text,
            created_at: self.created_at,
        }
    }
}

/// A persisted, immutable chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: ChatUser,
    pub room_id: RoomId,
    pub text: MessageText,
    pub created_at: Timestamp,
}
