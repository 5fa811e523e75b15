//! Routes command responses back into their rooms.

use std::sync::Arc;

use quoteroom_shared::time::Clock;

use crate::{
    domain::{
        ChatRepository, CommandQueue, CommandResponse, MessageId, MessageText, NewChatMessage,
        Timestamp,
    },
    hub::HubRegistry,
};

use super::RouteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Persisted and broadcast to the room's live members
    Delivered(MessageId),
    /// Persisted, but nobody was connected to the room
    NoResidentHub(MessageId),
}

/// Persists each command response and broadcasts it through the room's hub.
///
/// Responses for rooms that have no hub yet are kept in history only; no hub
/// is created for them.
pub struct ResponseRouter {
    queue: Arc<dyn CommandQueue>,
    repository: Arc<dyn ChatRepository>,
    registry: Arc<HubRegistry>,
    clock: Arc<dyn Clock>,
}

impl ResponseRouter {
    pub fn new(
        queue: Arc<dyn CommandQueue>,
        repository: Arc<dyn ChatRepository>,
        registry: Arc<HubRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queue,
            repository,
            registry,
            clock,
        }
    }

    /// Route responses until the queue shuts down
    pub async fn run(self) {
        tracing::info!("Response router started");
        while let Some(response) = self.queue.next_response().await {
            let room_id = response.room_id.clone();
            match self.route(response).await {
                Ok(RouteOutcome::Delivered(id)) => {
                    tracing::debug!("Response {} delivered to room '{}'", id.value(), room_id)
                }
                Ok(RouteOutcome::NoResidentHub(id)) => tracing::info!(
                    "No live hub for room '{}'; response {} kept in history only",
                    room_id,
                    id.value()
                ),
                Err(e) => tracing::warn!("Dropped response for room '{}': {}", room_id, e),
            }
        }
        tracing::info!("Response router stopped");
    }

    pub async fn route(&self, response: CommandResponse) -> Result<RouteOutcome, RouteError> {
        let message = NewChatMessage::new(
            response.author,
            response.room_id,
            MessageText::new(&response.text)?,
            Timestamp::new(self.clock.now_millis()),
        );
        let id = self.repository.add_message(message.clone()).await?;
        let message = message.persisted(id);

        let Some(hub) = self.registry.get(&message.room_id).await else {
            return Ok(RouteOutcome::NoResidentHub(id));
        };
        hub.broadcast(message).await?;
        Ok(RouteOutcome::Delivered(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quoteroom_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{
            ChatMessage, ChatUser, ConnectionId, RepositoryError, Room, RoomId, UserId, UserName,
        },
        hub::{HubConfig, Member},
        infrastructure::{queue::InMemoryCommandQueue, repository::InMemoryChatRepository},
    };

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn user(id: &str) -> ChatUser {
        ChatUser::new(
            UserId::new(id.to_string()).unwrap(),
            UserName::new(id.to_string()).unwrap(),
        )
    }

    fn response(room: &str, text: &str) -> CommandResponse {
        CommandResponse {
            room_id: room_id(room),
            author: user("stockbot"),
            text: text.to_string(),
        }
    }

    struct Fixture {
        queue: Arc<InMemoryCommandQueue>,
        repository: Arc<InMemoryChatRepository>,
        registry: Arc<HubRegistry>,
        router: ResponseRouter,
    }

    fn fixture() -> Fixture {
        let queue = Arc::new(InMemoryCommandQueue::default());
        let repository = Arc::new(InMemoryChatRepository::with_rooms([
            Room::new(room_id("r1"), "Room 1"),
            Room::new(room_id("r2"), "Room 2"),
        ]));
        let registry = Arc::new(HubRegistry::new(repository.clone(), HubConfig::default()));
        let router = ResponseRouter::new(
            queue.clone(),
            repository.clone(),
            registry.clone(),
            Arc::new(FixedClock::new(42)),
        );
        Fixture {
            queue,
            repository,
            registry,
            router,
        }
    }

    async fn join(registry: &HubRegistry, room: &str) -> mpsc::Receiver<Arc<ChatMessage>> {
        let hub = registry.get_or_create(&room_id(room)).await;
        let (tx, rx) = mpsc::channel(8);
        hub.register(Member::new(ConnectionId::generate(), user("alice"), tx))
            .await
            .unwrap();
        rx
    }

    #[tokio::test]
    async fn test_response_is_persisted_and_broadcast() {
        // given:
        let fixture = fixture();
        let mut rx = join(&fixture.registry, "r1").await;

        // when:
        let outcome = fixture
            .router
            .route(response("r1", "ACME quote is $1 per share"))
            .await
            .unwrap();

        // then:
        assert!(matches!(outcome, RouteOutcome::Delivered(_)));
        let message = rx.recv().await.unwrap();
        assert_eq!(message.text.as_str(), "ACME quote is $1 per share");
        assert_eq!(message.author.id.as_str(), "stockbot");
        assert_eq!(message.created_at, Timestamp::new(42));
        assert_eq!(fixture.repository.message_count().await, 1);
    }

    #[tokio::test]
    async fn test_room_without_hub_keeps_response_in_history_only() {
        // given:
        let fixture = fixture();

        // when:
        let outcome = fixture
            .router
            .route(response("r2", "ACME quote is $1 per share"))
            .await
            .unwrap();

        // then: no hub was created for the room
        assert!(matches!(outcome, RouteOutcome::NoResidentHub(_)));
        assert!(fixture.registry.get(&room_id("r2")).await.is_none());
        assert_eq!(fixture.repository.message_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_room_is_a_persistence_error() {
        let fixture = fixture();

        let result = fixture.router.route(response("nope", "text")).await;

        assert_eq!(
            result,
            Err(RouteError::Persistence(RepositoryError::RoomNotFound(
                "nope".to_string()
            )))
        );
    }

    #[tokio::test]
    async fn test_undeliverable_responses_do_not_block_later_ones() {
        // given:
        let fixture = fixture();
        let mut rx = join(&fixture.registry, "r1").await;
        let queue = fixture.queue.clone();
        let task = tokio::spawn(fixture.router.run());

        // when:
        for response in [
            response("r2", "nobody listening"),
            response("nope", "unknown room"),
            response("r1", "   "),
            response("r1", "GOOD quote is $10 per share"),
        ] {
            queue.publish_response(response).await.unwrap();
        }

        // then:
        let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message.text.as_str(), "GOOD quote is $10 per share");

        queue.shutdown().await;
        task.await.unwrap();
        assert_eq!(fixture.repository.message_count().await, 2);
    }
}
