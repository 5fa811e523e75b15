//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt, future};
use serde::Deserialize;

use crate::{
    connection::{Connection, Frame, TransportError},
    domain::{ChatUser, RoomId, UserId, UserName},
    ui::state::AppState,
    usecase::JoinRoomError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub user_id: String,
    pub user_name: String,
}

/// `GET /ws/chatroom/{room_id}?user_id=..&user_name=..`
///
/// The room is resolved before the upgrade so that unknown rooms are
/// answered with a plain HTTP status.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<JoinQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let Ok(room_id) = RoomId::new(room_id.clone()) else {
        tracing::warn!("Invalid room id: '{}'", room_id);
        return Err(StatusCode::BAD_REQUEST);
    };
    let user = match (UserId::new(query.user_id), UserName::new(query.user_name)) {
        (Ok(id), Ok(name)) => ChatUser::new(id, name),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Rejected join of room '{}': {}", room_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let room = match state.join_room.resolve_room(&room_id).await {
        Ok(room) => room,
        Err(JoinRoomError::RoomNotFound(_)) => {
            tracing::warn!("'{}' tried to join unknown room '{}'", user.id, room_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(e) => {
            tracing::error!("Failed to resolve room '{}': {}", room_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let max_message_size = state.join_room.config().max_message_size;
    let connection = Connection::new(user, room.id);
    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, connection)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection: Connection) {
    let connection_id = connection.id;
    let (sink, stream) = socket.split();

    // axum messages <-> transport frames
    let sink = sink
        .sink_map_err(TransportError::from)
        .with(|frame: Frame| future::ready(Ok::<_, TransportError>(Message::from(frame))));
    let stream = stream.map(|message| message.map(Frame::from).map_err(TransportError::from));

    match state.join_room.execute(connection, stream, sink).await {
        Ok(tasks) => {
            tasks.join().await;
            tracing::debug!("Connection {} finished", connection_id);
        }
        Err(e) => tracing::error!("Connection {} could not join: {}", connection_id, e),
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
            Frame::Ping(data) => Message::Ping(data.into()),
            Frame::Pong(data) => Message::Pong(data.into()),
            Frame::Close => Message::Close(None),
        }
    }
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Frame::Text(text.as_str().to_owned()),
            Message::Binary(data) => Frame::Binary(data.to_vec()),
            Message::Ping(data) => Frame::Ping(data.to_vec()),
            Message::Pong(data) => Frame::Pong(data.to_vec()),
            Message::Close(_) => Frame::Close,
        }
    }
}

impl From<axum::Error> for TransportError {
    fn from(error: axum::Error) -> Self {
        TransportError::Io(error.to_string())
    }
}
