//! Error types of the use case layer.

use thiserror::Error;

use crate::{domain::RepositoryError, hub::HubError};

/// Failure while posting a client's message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("failed to persist message: {0}")]
    Persistence(#[from] RepositoryError),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// Failure while joining a room
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("failed to look up room: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// Failure while listing rooms
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListRoomsError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("failed to read rooms: {0}")]
    Repository(#[from] RepositoryError),
}
