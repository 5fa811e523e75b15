//! Outbound pump: outbound queue to client.

use std::{sync::Arc, time::Duration};

use futures_util::{Sink, SinkExt};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    domain::{ChatMessage, ConnectionId},
    infrastructure::dto::websocket::ChatMessageDto,
};

use super::{ConnectionConfig, ConnectionError, Frame, TransportError};

/// Writes queued messages to the client and probes its liveness.
///
/// The pump stops when the hub closes the queue (after sending a close
/// frame), or on the first failed or overdue write. Either way the sink is
/// closed before returning.
pub struct OutboundPump {
    connection_id: ConnectionId,
    write_wait: Duration,
    ping_period: Duration,
}

impl OutboundPump {
    pub fn new(connection_id: ConnectionId, config: &ConnectionConfig) -> Self {
        Self {
            connection_id,
            write_wait: config.write_wait,
            ping_period: config.ping_period,
        }
    }

    pub async fn run<K>(self, mut queue: mpsc::Receiver<Arc<ChatMessage>>, mut sink: K)
    where
        K: Sink<Frame, Error = TransportError> + Unpin,
    {
        match self.write_loop(&mut queue, &mut sink).await {
            Ok(()) => tracing::debug!("Outbound queue of {} closed", self.connection_id),
            Err(e) => tracing::warn!("Outbound pump of {} failed: {}", self.connection_id, e),
        }

        match tokio::time::timeout(self.write_wait, sink.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("Closing transport of {}: {}", self.connection_id, e),
            Err(_) => tracing::debug!("Closing transport of {} timed out", self.connection_id),
        }
    }

    async fn write_loop<K>(
        &self,
        queue: &mut mpsc::Receiver<Arc<ChatMessage>>,
        sink: &mut K,
    ) -> Result<(), ConnectionError>
    where
        K: Sink<Frame, Error = TransportError> + Unpin,
    {
        let mut ping = tokio::time::interval_at(Instant::now() + self.ping_period, self.ping_period);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                next = queue.recv() => {
                    let Some(first) = next else {
                        self.write(sink, Frame::Close).await?;
                        return Ok(());
                    };
                    let batch = coalesce(first, queue);
                    let payload = encode_batch(&batch)?;
                    self.write(sink, Frame::Text(payload)).await?;
                    ping.reset();
                }
                _ = ping.tick() => {
                    self.write(sink, Frame::Ping(Vec::new())).await?;
                }
            }
        }
    }

    async fn write<K>(&self, sink: &mut K, frame: Frame) -> Result<(), ConnectionError>
    where
        K: Sink<Frame, Error = TransportError> + Unpin,
    {
        match tokio::time::timeout(self.write_wait, sink.send(frame)).await {
            Ok(result) => result.map_err(ConnectionError::from),
            Err(_) => Err(ConnectionError::WriteTimeout(self.write_wait)),
        }
    }
}

/// `first` plus whatever is queued right now; never waits for more
fn coalesce(
    first: Arc<ChatMessage>,
    queue: &mut mpsc::Receiver<Arc<ChatMessage>>,
) -> Vec<Arc<ChatMessage>> {
    let queued = queue.len();
    let mut batch = Vec::with_capacity(queued + 1);
    batch.push(first);
    for _ in 0..queued {
        match queue.try_recv() {
            Ok(message) => batch.push(message),
            Err(_) => break,
        }
    }
    batch
}

/// One JSON record per line
fn encode_batch(batch: &[Arc<ChatMessage>]) -> Result<String, serde_json::Error> {
    let lines = batch
        .iter()
        .map(|message| serde_json::to_string(&ChatMessageDto::from(message.as_ref())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}
