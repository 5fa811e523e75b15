//! In-memory implementation of the persistence port.
//!
//! Rooms are seeded at construction (room creation is an administrative
//! action outside this server). Messages get sequential ids starting at 1.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ChatRepository, MessageId, NewChatMessage, RepositoryError, Room, RoomId,
};

#[derive(Default)]
struct Store {
    rooms: HashMap<RoomId, Room>,
    /// Messages in insertion order
    messages: Vec<ChatMessage>,
    next_id: u64,
}

/// In-memory chat repository
#[derive(Default)]
pub struct InMemoryChatRepository {
    store: Mutex<Store>,
}

impl InMemoryChatRepository {
    /// Create a repository holding the given rooms and no messages
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let rooms = rooms
            .into_iter()
            .map(|room| (room.id.clone(), room))
            .collect();
        Self {
            store: Mutex::new(Store {
                rooms,
                messages: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Number of stored messages across all rooms
    pub async fn message_count(&self) -> usize {
        self.store.lock().await.messages.len()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn get_room_by_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.rooms.get(room_id).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let store = self.store.lock().await;
        let mut rooms: Vec<Room> = store.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rooms)
    }

    async fn add_message(&self, message: NewChatMessage) -> Result<MessageId, RepositoryError> {
        let mut store = self.store.lock().await;
        if !store.rooms.contains_key(&message.room_id) {
            return Err(RepositoryError::RoomNotFound(
                message.room_id.as_str().to_string(),
            ));
        }

        // ids start at 1 even for a Default-constructed store
        let id = MessageId::new(store.next_id.max(1));
        store.next_id = id.value() + 1;
        store.messages.push(message.persisted(id));
        Ok(id)
    }

    async fn recent_messages(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let store = self.store.lock().await;
        let mut recent: Vec<ChatMessage> = store
            .messages
            .iter()
            .rev()
            .filter(|message| &message.room_id == room_id)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }
}
