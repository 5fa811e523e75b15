//! Client connections and their paired I/O pumps.
//!
//! Every connection runs two tasks: the [`InboundPump`] turns client frames
//! into chat messages, the [`OutboundPump`] drains the connection's outbound
//! queue to the client. The queue is written and closed only by the room
//! hub, and read only by the outbound pump.

mod error;
mod frame;
mod inbound;
mod outbound;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::{ChatUser, ConnectionId, RoomId};

pub use error::ConnectionError;
pub use frame::{Frame, TransportError};
pub use inbound::InboundPump;
pub use outbound::OutboundPump;

/// Time allowed to write a frame to the client
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);
/// Time allowed between two frames from the client
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);
/// Interval of liveness probes; must be shorter than the pong wait
pub const DEFAULT_PING_PERIOD: Duration = Duration::from_secs(54);
/// Largest inbound frame accepted, in bytes
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;
/// Outbound messages buffered per connection before it counts as slow
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    pub write_wait: Duration,
    pub pong_wait: Duration,
    pub ping_period: Duration,
    pub max_message_size: usize,
    pub outbound_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            write_wait: DEFAULT_WRITE_WAIT,
            pong_wait: DEFAULT_PONG_WAIT,
            ping_period: DEFAULT_PING_PERIOD,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

/// One client's socket, bound to an authenticated user and a room
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub user: ChatUser,
    pub room_id: RoomId,
}

impl Connection {
    pub fn new(user: ChatUser, room_id: RoomId) -> Self {
        Self {
            id: ConnectionId::generate(),
            user,
            room_id,
        }
    }
}

/// Join handles of a connection's two pumps
pub struct ConnectionTasks {
    pub inbound: JoinHandle<()>,
    pub outbound: JoinHandle<()>,
}

impl ConnectionTasks {
    /// Wait until both pumps have exited
    pub async fn join(self) {
        if let Err(e) = self.inbound.await {
            tracing::error!("Inbound pump task failed: {}", e);
        }
        if let Err(e) = self.outbound.await {
            tracing::error!("Outbound pump task failed: {}", e);
        }
    }
}
