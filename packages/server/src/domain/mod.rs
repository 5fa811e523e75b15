//! Domain layer: entities, value objects and the ports the core depends on.
//!
//! Infrastructure adapters implement the port traits defined here
//! ([`ChatRepository`], [`CommandQueue`], [`QuoteSource`]).

pub mod entity;
pub mod error;
pub mod message_kind;
pub mod queue;
pub mod quote;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, ChatUser, NewChatMessage, Room};
pub use error::{QueueError, QuoteError, RepositoryError, ValueObjectError};
pub use message_kind::{MessageKind, STOCK_COMMAND_PREFIX};
pub use queue::{CommandQueue, CommandRequest, CommandResponse};
pub use quote::{QuoteSource, StockQuote};
pub use repository::{ChatRepository, DEFAULT_HISTORY_LIMIT};
pub use value_object::{
    ConnectionId, MessageId, MessageText, RoomId, Timestamp, UserId, UserName,
};

#[cfg(test)]
pub use queue::MockCommandQueue;
#[cfg(test)]
pub use quote::MockQuoteSource;
#[cfg(test)]
pub use repository::MockChatRepository;
