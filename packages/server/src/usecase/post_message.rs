//! UseCase: post a client's message to its room.

use std::sync::Arc;

use quoteroom_shared::time::Clock;

use crate::{
    domain::{
        ChatMessage, ChatRepository, ChatUser, CommandQueue, CommandRequest, MessageKind,
        MessageText, NewChatMessage, Timestamp,
    },
    hub::RoomHub,
};

use super::error::PostMessageError;

/// Persists, broadcasts and (for commands) enqueues one inbound message
pub struct PostMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    queue: Arc<dyn CommandQueue>,
    clock: Arc<dyn Clock>,
}

impl PostMessageUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        queue: Arc<dyn CommandQueue>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            queue,
            clock,
        }
    }

    /// Post `raw_text` written by `author` into the room of `hub`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(message))` - the persisted and broadcast message
    /// * `Ok(None)` - the text was blank after normalization; nothing happened
    /// * `Err(PostMessageError)` - persistence or the hub failed
    ///
    /// A failed command publication is logged and does not fail the call.
    pub async fn execute(
        &self,
        author: &ChatUser,
        hub: &RoomHub,
        raw_text: &str,
    ) -> Result<Option<ChatMessage>, PostMessageError> {
        let Ok(text) = MessageText::new(raw_text) else {
            tracing::debug!("Ignoring blank message from '{}'", author.id);
            return Ok(None);
        };
        let kind = MessageKind::classify(text.as_str());

        let new_message = NewChatMessage::new(
            author.clone(),
            hub.room_id().clone(),
            text,
            Timestamp::new(self.clock.now_millis()),
        );
        let id = self.repository.add_message(new_message.clone()).await?;
        let message = new_message.persisted(id);

        hub.broadcast(message.clone()).await?;
        tracing::debug!(
            "Message {} from '{}' broadcast in room '{}'",
            id.value(),
            author.id,
            message.room_id
        );

        if let MessageKind::StockQuote { symbol } = kind {
            let request = CommandRequest {
                room_id: message.room_id.clone(),
                user_id: author.id.clone(),
                text: message.text.as_str().to_string(),
            };
            match self.queue.publish_request(request).await {
                Ok(()) => tracing::info!("Queued quote request for '{}'", symbol),
                Err(e) => tracing::warn!("Failed to queue quote request for '{}': {}", symbol, e),
            }
        }

        Ok(Some(message))
    }
}
