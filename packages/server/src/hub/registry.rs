//! Owned registry of resident room hubs.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{ChatRepository, RoomId};

use super::{HubConfig, RoomHub};

/// Room id to hub mapping.
///
/// Created once at startup and shared by reference. The lock only guards
/// lookup and insert-if-absent; hub internals are never touched under it.
/// Hubs are created on first use and stay resident for the process lifetime.
pub struct HubRegistry {
    hubs: Mutex<HashMap<RoomId, RoomHub>>,
    repository: Arc<dyn ChatRepository>,
    config: HubConfig,
}

impl HubRegistry {
    pub fn new(repository: Arc<dyn ChatRepository>, config: HubConfig) -> Self {
        Self {
            hubs: Mutex::new(HashMap::new()),
            repository,
            config,
        }
    }

    /// The hub of `room_id`, spawning it if this is the room's first use
    pub async fn get_or_create(&self, room_id: &RoomId) -> RoomHub {
        let mut hubs = self.hubs.lock().await;
        if let Some(hub) = hubs.get(room_id) {
            return hub.clone();
        }

        let hub = RoomHub::spawn(room_id.clone(), self.repository.clone(), self.config);
        hubs.insert(room_id.clone(), hub.clone());
        tracing::info!("Created hub for room '{}'", room_id);
        hub
    }

    /// The resident hub of `room_id`, if any client ever joined it
    pub async fn get(&self, room_id: &RoomId) -> Option<RoomHub> {
        self.hubs.lock().await.get(room_id).cloned()
    }
}
