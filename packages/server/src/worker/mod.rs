//! Background consumers of the command queue.
//!
//! [`CommandWorker`]s turn `/stock=` requests into quote announcements;
//! the [`ResponseRouter`] feeds those announcements back into the rooms.

mod command_worker;
mod response_router;

use thiserror::Error;

use crate::{
    domain::{QueueError, QuoteError, RepositoryError, ValueObjectError},
    hub::HubError,
};

pub use command_worker::CommandWorker;
pub use response_router::{ResponseRouter, RouteOutcome};

/// Why a command request produced no response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("not a quote command: '{0}'")]
    NotACommand(String),

    #[error("quote lookup failed: {0}")]
    Quote(#[from] QuoteError),

    #[error("failed to publish response: {0}")]
    Publish(#[from] QueueError),
}

/// Why a command response could not be delivered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid response text: {0}")]
    InvalidText(#[from] ValueObjectError),

    #[error("failed to persist response: {0}")]
    Persistence(#[from] RepositoryError),

    #[error(transparent)]
    Hub(#[from] HubError),
}
