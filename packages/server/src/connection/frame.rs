//! Transport-neutral frames exchanged with a client.
//!
//! The pumps speak [`Frame`] so they can run over any message-oriented
//! transport; the WebSocket handler converts to and from axum messages.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,

    #[error("transport error: {0}")]
    Io(String),
}
