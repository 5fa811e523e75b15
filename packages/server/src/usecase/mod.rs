//! Application use cases.

mod error;
mod join_room;
mod list_rooms;
mod post_message;

pub use error::{JoinRoomError, ListRoomsError, PostMessageError};
pub use join_room::JoinRoomUseCase;
pub use list_rooms::{ListRoomsUseCase, RoomOccupancy};
pub use post_message::PostMessageUseCase;
