//! The room hub actor and its handle.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{mpsc, oneshot};

use crate::domain::{
    ChatMessage, ChatRepository, ChatUser, ConnectionId, DEFAULT_HISTORY_LIMIT, RoomId,
};

use super::HubError;

/// Sending half of a connection's outbound queue
pub type OutboundSender = mpsc::Sender<Arc<ChatMessage>>;

const DEFAULT_CONTROL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Messages replayed to a member when it registers
    pub history_limit: usize,
    /// Pending control operations before submitters wait
    pub control_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            control_capacity: DEFAULT_CONTROL_CAPACITY,
        }
    }
}

/// A live connection as seen by its hub.
///
/// The hub holds the only [`OutboundSender`] of the connection, so dropping
/// the member is what closes the connection's outbound queue.
#[derive(Debug)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub user: ChatUser,
    outbound: OutboundSender,
}

impl Member {
    pub fn new(connection_id: ConnectionId, user: ChatUser, outbound: OutboundSender) -> Self {
        Self {
            connection_id,
            user,
            outbound,
        }
    }
}

pub(super) enum HubCommand {
    Register(Member),
    Unregister(ConnectionId),
    Broadcast(Arc<ChatMessage>),
    MemberCount(oneshot::Sender<usize>),
}

/// Handle to a running room hub
#[derive(Clone)]
pub struct RoomHub {
    room_id: RoomId,
    pub(super) commands: mpsc::Sender<HubCommand>,
}

impl RoomHub {
    /// Spawn the hub's control loop on the current runtime
    pub fn spawn(room_id: RoomId, repository: Arc<dyn ChatRepository>, config: HubConfig) -> Self {
        let (commands, receiver) = mpsc::channel(config.control_capacity.max(1));
        let hub_loop = HubLoop {
            room_id: room_id.clone(),
            members: HashMap::new(),
            repository,
            history_limit: config.history_limit,
        };
        tokio::spawn(hub_loop.run(receiver));

        Self { room_id, commands }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Add a member and replay the room's recent history to it
    pub async fn register(&self, member: Member) -> Result<(), HubError> {
        self.submit(HubCommand::Register(member)).await
    }

    /// Remove a member; unknown ids are ignored
    pub async fn unregister(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.submit(HubCommand::Unregister(connection_id)).await
    }

    /// Fan a message out to every current member
    pub async fn broadcast(&self, message: ChatMessage) -> Result<(), HubError> {
        self.submit(HubCommand::Broadcast(Arc::new(message))).await
    }

    /// Number of members once every previously submitted operation is applied
    pub async fn member_count(&self) -> Result<usize, HubError> {
        let (reply, count) = oneshot::channel();
        self.submit(HubCommand::MemberCount(reply)).await?;
        count.await.map_err(|_| self.stopped())
    }

    async fn submit(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> HubError {
        HubError::Stopped(self.room_id.as_str().to_string())
    }
}

struct HubLoop {
    room_id: RoomId,
    members: HashMap<ConnectionId, Member>,
    repository: Arc<dyn ChatRepository>,
    history_limit: usize,
}

impl HubLoop {
    async fn run(mut self, mut commands: mpsc::Receiver<HubCommand>) {
        tracing::debug!("Hub for room '{}' started", self.room_id);

        while let Some(command) = commands.recv().await {
            match command {
                HubCommand::Register(member) => self.register(member).await,
                HubCommand::Unregister(connection_id) => self.unregister(&connection_id),
                HubCommand::Broadcast(message) => self.broadcast(&message),
                HubCommand::MemberCount(reply) => {
                    let _ = reply.send(self.members.len());
                }
            }
        }

        tracing::debug!("Hub for room '{}' stopped", self.room_id);
    }

    async fn register(&mut self, member: Member) {
        let connection_id = member.connection_id;
        if self.members.insert(connection_id, member).is_some() {
            tracing::warn!(
                "Connection {} registered twice in room '{}'; replacing it",
                connection_id,
                self.room_id
            );
        }

        // A member never stays in the room without its history.
        let history = match self
            .repository
            .recent_messages(&self.room_id, self.history_limit)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    "Failed to load history of room '{}' for {}: {}",
                    self.room_id,
                    connection_id,
                    e
                );
                self.evict(&connection_id);
                return;
            }
        };

        for message in history {
            let sent = match self.members.get(&connection_id) {
                Some(member) => member.outbound.try_send(Arc::new(message)),
                None => return,
            };
            if sent.is_err() {
                tracing::warn!(
                    "History replay to {} in room '{}' did not fit its queue",
                    connection_id,
                    self.room_id
                );
                self.evict(&connection_id);
                return;
            }
        }

        tracing::info!(
            "Connection {} joined room '{}' (members: {})",
            connection_id,
            self.room_id,
            self.members.len()
        );
    }

    fn unregister(&mut self, connection_id: &ConnectionId) {
        if let Some(member) = self.members.remove(connection_id) {
            tracing::info!(
                "Connection {} ({}) left room '{}' (members: {})",
                connection_id,
                member.user.name.as_str(),
                self.room_id,
                self.members.len()
            );
        }
    }

    fn broadcast(&mut self, message: &Arc<ChatMessage>) {
        let mut dead = Vec::new();

        for (connection_id, member) in &self.members {
            match member.outbound.try_send(message.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Connection {} in room '{}' is too slow; disconnecting it",
                        connection_id,
                        self.room_id
                    );
                    dead.push(*connection_id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(
                        "Connection {} in room '{}' is gone",
                        connection_id,
                        self.room_id
                    );
                    dead.push(*connection_id);
                }
            }
        }

        for connection_id in dead {
            self.evict(&connection_id);
        }
    }

    fn evict(&mut self, connection_id: &ConnectionId) {
        if self.members.remove(connection_id).is_some() {
            tracing::info!(
                "Evicted connection {} from room '{}' (members: {})",
                connection_id,
                self.room_id,
                self.members.len()
            );
        }
    }
}
