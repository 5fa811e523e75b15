//! UseCase: attach a client connection to a room.

use std::sync::Arc;

use futures_util::{Sink, Stream};
use tokio::sync::{mpsc, oneshot};

use crate::{
    connection::{
        Connection, ConnectionConfig, ConnectionTasks, Frame, InboundPump, OutboundPump,
        TransportError,
    },
    domain::{ChatRepository, Room, RoomId},
    hub::{HubRegistry, Member},
};

use super::{PostMessageUseCase, error::JoinRoomError};

pub struct JoinRoomUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<HubRegistry>,
    post_message: Arc<PostMessageUseCase>,
    config: ConnectionConfig,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        registry: Arc<HubRegistry>,
        post_message: Arc<PostMessageUseCase>,
        config: ConnectionConfig,
    ) -> Self {
        Self {
            repository,
            registry,
            post_message,
            config,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Look the room up before a transport is opened for it
    pub async fn resolve_room(&self, room_id: &RoomId) -> Result<Room, JoinRoomError> {
        self.repository
            .get_room_by_id(room_id)
            .await?
            .ok_or_else(|| JoinRoomError::RoomNotFound(room_id.as_str().to_string()))
    }

    /// Register `connection` with its room's hub and start both pumps.
    ///
    /// The hub is created if this is the room's first connection. The
    /// registration is queued before either pump starts, so the history
    /// replay precedes anything this connection posts. Once the outbound pump
    /// has closed the transport (eviction, failed write) the inbound pump
    /// stops reading too.
    pub async fn execute<S, K>(
        &self,
        connection: Connection,
        stream: S,
        sink: K,
    ) -> Result<ConnectionTasks, JoinRoomError>
    where
        S: Stream<Item = Result<Frame, TransportError>> + Unpin + Send + 'static,
        K: Sink<Frame, Error = TransportError> + Unpin + Send + 'static,
    {
        let hub = self.registry.get_or_create(&connection.room_id).await;
        let (outbound_tx, outbound_rx) = mpsc::channel(self.config.outbound_capacity.max(1));

        hub.register(Member::new(connection.id, connection.user.clone(), outbound_tx))
            .await?;
        tracing::info!(
            "'{}' connected to room '{}' as {}",
            connection.user.name.as_str(),
            connection.room_id,
            connection.id
        );

        // Dropped when the outbound pump has closed the transport
        let (transport_open, transport_closed) = oneshot::channel::<()>();

        let outbound = OutboundPump::new(connection.id, &self.config);
        let outbound = tokio::spawn(async move {
            outbound.run(outbound_rx, sink).await;
            drop(transport_open);
        });

        let inbound = InboundPump::new(
            connection,
            hub,
            self.post_message.clone(),
            self.config.pong_wait,
        );
        let inbound = tokio::spawn(inbound.run(stream, async move {
            let _ = transport_closed.await;
        }));

        Ok(ConnectionTasks { inbound, outbound })
    }
}
