//! Data Transfer Objects (DTOs) for the chat application.
//!
//! DTOs are organized by protocol:
//! - `websocket`: records written to client sockets
//! - `queue`: records carried by the command queue
//! - `http`: HTTP API response bodies

pub mod conversion;
pub mod http;
pub mod queue;
pub mod websocket;
