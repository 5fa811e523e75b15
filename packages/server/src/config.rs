//! Server configuration.

use std::{str::FromStr, time::Duration};

use thiserror::Error;

use crate::{
    connection::ConnectionConfig,
    domain::{ChatUser, Room, RoomId, UserId, UserName, ValueObjectError},
    hub::HubConfig,
    infrastructure::{
        queue::inmemory::DEFAULT_TOPIC_CAPACITY,
        quote::stooq::{DEFAULT_QUOTE_ENDPOINT, DEFAULT_QUOTE_TIMEOUT},
    },
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKER_COUNT: usize = 1;
pub const DEFAULT_BOT_ID: &str = "stockbot";
pub const DEFAULT_BOT_NAME: &str = "StockBot";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("room must be given as 'id:name', got '{0}'")]
    RoomFormat(String),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),
}

/// A room seeded at startup, parsed from `id:name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSeed(pub Room);

impl FromStr for RoomSeed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, name) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::RoomFormat(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::RoomFormat(s.to_string()));
        }
        Ok(Self(Room::new(RoomId::new(id.trim().to_string())?, name)))
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Rooms that exist for the lifetime of the process
    pub rooms: Vec<Room>,
    pub hub: HubConfig,
    pub connection: ConnectionConfig,
    /// Capacity of each command queue topic
    pub queue_capacity: usize,
    /// Number of command workers competing for requests
    pub workers: usize,
    pub quote_endpoint: String,
    pub quote_timeout: Duration,
    /// Author of quote announcements
    pub bot: ChatUser,
}

impl ServerConfig {
    pub fn bot_user(id: &str, name: &str) -> Result<ChatUser, ConfigError> {
        Ok(ChatUser::new(
            UserId::new(id.to_string())?,
            UserName::new(name.to_string())?,
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rooms: vec![default_room()],
            hub: HubConfig::default(),
            connection: ConnectionConfig::default(),
            queue_capacity: DEFAULT_TOPIC_CAPACITY,
            workers: DEFAULT_WORKER_COUNT,
            quote_endpoint: DEFAULT_QUOTE_ENDPOINT.to_string(),
            quote_timeout: DEFAULT_QUOTE_TIMEOUT,
            bot: default_bot(),
        }
    }
}

fn default_room() -> Room {
    Room::new(RoomId::from_static("general"), "General")
}

fn default_bot() -> ChatUser {
    ChatUser::new(
        UserId::from_static(DEFAULT_BOT_ID),
        UserName::from_static(DEFAULT_BOT_NAME),
    )
}
