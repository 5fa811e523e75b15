//! UseCase: room listing and room detail with live member counts.

use std::sync::Arc;

use crate::{
    domain::{ChatRepository, Room, RoomId},
    hub::HubRegistry,
};

use super::error::ListRoomsError;

/// A room together with the number of connections currently in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub room: Room,
    pub members: usize,
}

pub struct ListRoomsUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<HubRegistry>,
}

impl ListRoomsUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>, registry: Arc<HubRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    pub async fn execute(&self) -> Result<Vec<RoomOccupancy>, ListRoomsError> {
        let rooms = self.repository.list_rooms().await?;
        let mut occupancies = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = self.members_of(&room.id).await;
            occupancies.push(RoomOccupancy { room, members });
        }
        Ok(occupancies)
    }

    pub async fn detail(&self, room_id: &RoomId) -> Result<RoomOccupancy, ListRoomsError> {
        let room = self
            .repository
            .get_room_by_id(room_id)
            .await?
            .ok_or_else(|| ListRoomsError::RoomNotFound(room_id.as_str().to_string()))?;
        let members = self.members_of(&room.id).await;
        Ok(RoomOccupancy { room, members })
    }

    /// Rooms that never had a connection have no hub and count as empty
    async fn members_of(&self, room_id: &RoomId) -> usize {
        let Some(hub) = self.registry.get(room_id).await else {
            return 0;
        };
        match hub.member_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Failed to count members of room '{}': {}", room_id, e);
                0
            }
        }
    }
}
