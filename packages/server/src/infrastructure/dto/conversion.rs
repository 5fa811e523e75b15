//! Conversion logic between DTOs and domain entities.

use quoteroom_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, ChatUser, CommandRequest, CommandResponse, RoomId, UserId, UserName,
    ValueObjectError,
};
use crate::infrastructure::dto::{
    queue::{CommandRequestRecord, CommandResponseRecord},
    websocket::ChatMessageDto,
};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: model.id.value(),
            user_id: model.author.id.as_str().to_string(),
            user_name: model.author.name.as_str().to_string(),
            room_id: model.room_id.as_str().to_string(),
            text: model.text.as_str().to_string(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<CommandRequest> for CommandRequestRecord {
    fn from(model: CommandRequest) -> Self {
        Self {
            room_id: model.room_id.into_string(),
            user_id: model.user_id.into_string(),
            text: model.text,
        }
    }
}

impl From<CommandResponse> for CommandResponseRecord {
    fn from(model: CommandResponse) -> Self {
        Self {
            room_id: model.room_id.into_string(),
            user_id: model.author.id.into_string(),
            user_name: model.author.name.into_string(),
            text: model.text,
        }
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<CommandRequestRecord> for CommandRequest {
    type Error = ValueObjectError;

    fn try_from(record: CommandRequestRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: RoomId::new(record.room_id)?,
            user_id: UserId::new(record.user_id)?,
            text: record.text,
        })
    }
}

impl TryFrom<CommandResponseRecord> for CommandResponse {
    type Error = ValueObjectError;

    fn try_from(record: CommandResponseRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            room_id: RoomId::new(record.room_id)?,
            author: ChatUser::new(UserId::new(record.user_id)?, UserName::new(record.user_name)?),
            text: record.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, MessageText, Timestamp};

    #[test]
    fn test_domain_chat_message_to_dto() {
        // given:
        let message = ChatMessage {
            id: MessageId::new(7),
            author: ChatUser::new(
                UserId::new("u1".to_string()).unwrap(),
                UserName::new("alice".to_string()).unwrap(),
            ),
            room_id: RoomId::new("r1".to_string()).unwrap(),
            text: MessageText::new("hello").unwrap(),
            created_at: Timestamp::new(1672531200000),
        };

        // when:
        let dto = ChatMessageDto::from(&message);

        // then:
        assert_eq!(dto.id, 7);
        assert_eq!(dto.user_id, "u1");
        assert_eq!(dto.user_name, "alice");
        assert_eq!(dto.room_id, "r1");
        assert_eq!(dto.text, "hello");
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_request_record_with_blank_room_is_rejected() {
        // given: a record that did not come from this server
        let record = CommandRequestRecord {
            room_id: String::new(),
            user_id: "u1".to_string(),
            text: "/stock=ACME".to_string(),
        };

        // when:
        let result = CommandRequest::try_from(record);

        // then:
        assert_eq!(result, Err(ValueObjectError::Empty("room id")));
    }

    #[test]
    fn test_response_record_to_domain() {
        let record = CommandResponseRecord {
            room_id: "r1".to_string(),
            user_id: "stockbot".to_string(),
            user_name: "StockBot".to_string(),
            text: "ACME quote is $1 per share".to_string(),
        };

        let response = CommandResponse::try_from(record).unwrap();

        assert_eq!(response.room_id.as_str(), "r1");
        assert_eq!(response.author.name.as_str(), "StockBot");
        assert_eq!(response.text, "ACME quote is $1 per share");
    }
}
