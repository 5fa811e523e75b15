//! Dependency wiring shared by the binary and the integration tests.

use std::sync::Arc;

use quoteroom_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::{
    config::ServerConfig,
    domain::{ChatRepository, CommandQueue, QuoteSource},
    hub::HubRegistry,
    infrastructure::{queue::InMemoryCommandQueue, repository::InMemoryChatRepository},
    ui::{Server, state::AppState},
    usecase::{JoinRoomUseCase, ListRoomsUseCase, PostMessageUseCase},
    worker::{CommandWorker, ResponseRouter},
};

/// Every long-lived component of a running server
pub struct App {
    config: ServerConfig,
    repository: Arc<dyn ChatRepository>,
    registry: Arc<HubRegistry>,
    queue: Arc<InMemoryCommandQueue>,
    quotes: Arc<dyn QuoteSource>,
    clock: Arc<dyn Clock>,
    state: Arc<AppState>,
}

impl App {
    pub fn new(config: ServerConfig, quotes: Arc<dyn QuoteSource>, clock: Arc<dyn Clock>) -> Self {
        // 1. Repository, seeded with the configured rooms
        for room in &config.rooms {
            tracing::info!("Room '{}' ({}) available", room.id, room.name);
        }
        let repository: Arc<dyn ChatRepository> =
            Arc::new(InMemoryChatRepository::with_rooms(config.rooms.clone()));

        // 2. Hub registry and command queue
        let registry = Arc::new(HubRegistry::new(repository.clone(), config.hub));
        let queue = Arc::new(InMemoryCommandQueue::new(config.queue_capacity));

        // 3. UseCases
        let post_message = Arc::new(PostMessageUseCase::new(
            repository.clone(),
            queue.clone(),
            clock.clone(),
        ));
        let join_room = Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            registry.clone(),
            post_message,
            config.connection,
        ));
        let list_rooms = Arc::new(ListRoomsUseCase::new(repository.clone(), registry.clone()));

        // 4. AppState
        let state = Arc::new(AppState {
            join_room,
            list_rooms,
        });

        Self {
            config,
            repository,
            registry,
            queue,
            quotes,
            clock,
            state,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn ChatRepository> {
        &self.repository
    }

    pub fn registry(&self) -> &Arc<HubRegistry> {
        &self.registry
    }

    /// Start the command workers and the response router
    pub fn spawn_workers(&self) -> Vec<JoinHandle<()>> {
        let queue: Arc<dyn CommandQueue> = self.queue.clone();
        let mut handles: Vec<JoinHandle<()>> = (0..self.config.workers.max(1))
            .map(|id| {
                let worker = CommandWorker::new(
                    id,
                    queue.clone(),
                    self.quotes.clone(),
                    self.config.bot.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        let router = ResponseRouter::new(
            queue,
            self.repository.clone(),
            self.registry.clone(),
            self.clock.clone(),
        );
        handles.push(tokio::spawn(router.run()));
        handles
    }

    pub fn server(&self) -> Server {
        Server::new(self.state.clone())
    }

    /// Close the command queue and wait for its consumers to drain it
    pub async fn shutdown(&self, workers: Vec<JoinHandle<()>>) {
        self.queue.shutdown().await;
        for handle in workers {
            if let Err(e) = handle.await {
                tracing::error!("Worker task failed: {}", e);
            }
        }
    }
}
