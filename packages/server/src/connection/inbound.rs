//! Inbound pump: client to room hub.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use futures_util::{Stream, StreamExt};

use crate::{hub::RoomHub, usecase::PostMessageUseCase};

use super::{Connection, ConnectionError, Frame, TransportError};

/// Reads client frames and posts them to the connection's room.
///
/// Every read must complete within the idle timeout; any frame from the
/// client (pongs included) resets it. The pump also stops as soon as the
/// transport is closed from the outbound side. On every exit path the
/// connection is unregistered from its hub, which in turn closes the outbound
/// queue.
pub struct InboundPump {
    connection: Connection,
    hub: RoomHub,
    post_message: Arc<PostMessageUseCase>,
    idle_timeout: Duration,
}

impl InboundPump {
    pub fn new(
        connection: Connection,
        hub: RoomHub,
        post_message: Arc<PostMessageUseCase>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            connection,
            hub,
            post_message,
            idle_timeout,
        }
    }

    /// Read `stream` until the client leaves or `transport_closed` resolves
    pub async fn run<S, F>(self, mut stream: S, transport_closed: F)
    where
        S: Stream<Item = Result<Frame, TransportError>> + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(transport_closed);

        match self.read_loop(&mut stream, transport_closed).await {
            Ok(()) => tracing::info!(
                "'{}' left room '{}'",
                self.connection.user.name.as_str(),
                self.connection.room_id
            ),
            Err(e) => tracing::warn!(
                "Inbound pump of {} in room '{}' stopped: {}",
                self.connection.id,
                self.connection.room_id,
                e
            ),
        }

        if let Err(e) = self.hub.unregister(self.connection.id).await {
            tracing::error!("Failed to unregister {}: {}", self.connection.id, e);
        }
    }

    async fn read_loop<S, F>(
        &self,
        stream: &mut S,
        mut transport_closed: Pin<&mut F>,
    ) -> Result<(), ConnectionError>
    where
        S: Stream<Item = Result<Frame, TransportError>> + Unpin,
        F: Future<Output = ()>,
    {
        loop {
            let next = tokio::select! {
                biased;
                _ = transport_closed.as_mut() => {
                    tracing::debug!("Transport of {} closed by the server", self.connection.id);
                    return Ok(());
                }
                next = tokio::time::timeout(self.idle_timeout, stream.next()) => {
                    next.map_err(|_| ConnectionError::IdleTimeout(self.idle_timeout))?
                }
            };

            match next.transpose()? {
                None | Some(Frame::Close) => return Ok(()),
                Some(Frame::Text(text)) => {
                    self.post_message
                        .execute(&self.connection.user, &self.hub, &text)
                        .await?;
                }
                Some(Frame::Ping(_)) | Some(Frame::Pong(_)) => {
                    tracing::trace!("Liveness frame from {}", self.connection.id);
                }
                Some(Frame::Binary(_)) => {
                    tracing::debug!("Ignoring binary frame from {}", self.connection.id);
                }
            }
        }
    }
}
