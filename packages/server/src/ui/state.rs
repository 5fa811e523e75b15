//! Shared state of the HTTP handlers.

use std::sync::Arc;

use crate::usecase::{JoinRoomUseCase, ListRoomsUseCase};

pub struct AppState {
    /// JoinRoomUseCase (room lookup and connection startup)
    pub join_room: Arc<JoinRoomUseCase>,
    /// ListRoomsUseCase (room listing with live member counts)
    pub list_rooms: Arc<ListRoomsUseCase>,
}
