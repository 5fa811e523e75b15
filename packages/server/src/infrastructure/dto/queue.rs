//! Command queue payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequestRecord {
    pub room_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponseRecord {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
}
