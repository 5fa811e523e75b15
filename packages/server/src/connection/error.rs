use std::time::Duration;

use thiserror::Error;

use crate::usecase::PostMessageError;

use super::frame::TransportError;

/// Reason a connection pump stopped
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no frame received within {0:?}")]
    IdleTimeout(Duration),

    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),

    #[error("failed to encode outbound messages: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    PostMessage(#[from] PostMessageError),
}
