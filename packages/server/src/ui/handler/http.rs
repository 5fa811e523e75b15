//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::RoomSummaryDto,
    ui::state::AppState,
    usecase::{ListRoomsError, RoomOccupancy},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomSummaryDto>>, StatusCode> {
    match state.list_rooms.execute().await {
        Ok(rooms) => Ok(Json(rooms.into_iter().map(to_summary).collect())),
        Err(e) => {
            tracing::error!("Failed to list rooms: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.list_rooms.detail(&room_id).await {
        Ok(room) => Ok(Json(to_summary(room))),
        Err(ListRoomsError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e @ ListRoomsError::Repository(_)) => {
            tracing::error!("Failed to read room '{}': {}", room_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn to_summary(occupancy: RoomOccupancy) -> RoomSummaryDto {
    RoomSummaryDto {
        id: occupancy.room.id.into_string(),
        name: occupancy.room.name,
        members: occupancy.members,
    }
}
