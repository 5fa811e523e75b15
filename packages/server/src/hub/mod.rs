//! Per-room broadcast hubs.
//!
//! A [`RoomHub`] is a handle to an actor task that owns one room's member
//! set. Membership changes and broadcasts are queued on a single control
//! channel and applied one at a time, in the order they were submitted.
//! The [`HubRegistry`] maps room ids to their resident hubs.

mod registry;
mod room_hub;

use thiserror::Error;

pub use registry::HubRegistry;
pub use room_hub::{HubConfig, Member, OutboundSender, RoomHub};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("hub for room '{0}' has stopped")]
    Stopped(String),
}
