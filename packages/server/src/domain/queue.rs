//! Command queue port and the records it carries.
//!
//! Two logical topics bridge the chat core and the quote bot:
//! requests flow from connections to workers, responses flow from workers to
//! the response router. Delivery is at-most-once; consumers tolerate loss.

use async_trait::async_trait;

use super::{ChatUser, QueueError, RoomId, UserId};

/// Topic carrying command requests to the workers
pub const COMMAND_REQUESTS_TOPIC: &str = "command_requests";
/// Topic carrying synthesized replies back to the rooms
pub const COMMAND_RESPONSES_TOPIC: &str = "command_responses";

/// A command typed into a room, waiting for a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub text: String,
}

/// A synthesized chat message produced by a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub room_id: RoomId,
    pub author: ChatUser,
    pub text: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandQueue: Send + Sync {
    async fn publish_request(&self, request: CommandRequest) -> Result<(), QueueError>;

    async fn publish_response(&self, response: CommandResponse) -> Result<(), QueueError>;

    /// Wait for the next request; `None` once the queue has shut down
    async fn next_request(&self) -> Option<CommandRequest>;

    /// Wait for the next response; `None` once the queue has shut down
    async fn next_response(&self) -> Option<CommandResponse>;
}
