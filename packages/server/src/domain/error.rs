//! Error types raised by the domain layer and its ports.

use thiserror::Error;

/// Validation failure while constructing a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
}

/// Failure reported by the persistence port
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the command queue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("topic '{0}' is full")]
    Full(&'static str),

    #[error("topic '{0}' is closed")]
    Closed(&'static str),

    #[error("failed to encode record: {0}")]
    Encode(String),
}

/// Failure while looking up a stock quote
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Request(String),

    #[error("quote source answered with status {0}")]
    Status(u16),

    #[error("malformed quote response: {0}")]
    Malformed(String),

    #[error("no quote available for '{0}'")]
    Unavailable(String),
}
