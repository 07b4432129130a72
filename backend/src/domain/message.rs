//! Direct messages between users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::{
    EntityField, FieldCollector, FieldMode, INVALID_STRING_MESSAGE, InvalidFields, RawField,
    parse_id, parse_string,
};
use crate::domain::{UserId, ValidationRules};

/// Summary attached to rejected message payloads.
pub const INVALID_MESSAGE_MESSAGE: &str = "All message information must be properly fulfilled";

/// Stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    #[schema(example = 1)]
    pub id: i32,
    pub sender_user_id: UserId,
    pub receiver_user_id: UserId,
    #[schema(example = "See you there!")]
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Whether the message was exchanged between `a` and `b`, in either
    /// direction.
    pub fn between(&self, a: UserId, b: UserId) -> bool {
        (self.sender_user_id == a && self.receiver_user_id == b)
            || (self.sender_user_id == b && self.receiver_user_id == a)
    }
}

/// Message fields a client may supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageField {
    ReceiverUserId,
    Content,
}

impl EntityField for MessageField {
    fn name(self) -> &'static str {
        match self {
            Self::ReceiverUserId => "receiver_user_id",
            Self::Content => "content",
        }
    }

    fn message(self, _rules: &ValidationRules) -> String {
        match self {
            Self::ReceiverUserId => "Must be a valid user ID".to_owned(),
            Self::Content => INVALID_STRING_MESSAGE.to_owned(),
        }
    }
}

/// Validated message ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_user_id: UserId,
    pub receiver_user_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Message payload as received, before validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RawMessage {
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 2)]
    pub receiver_user_id: RawField,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "See you there!")]
    pub content: RawField,
}

impl RawMessage {
    /// Validate a message; the sender and timestamp come from the server.
    pub fn into_new_message(
        self,
        sender_user_id: UserId,
        timestamp: DateTime<Utc>,
        rules: &ValidationRules,
    ) -> Result<NewMessage, InvalidFields<MessageField>> {
        let mut collector = FieldCollector::new(FieldMode::Required, rules);
        let receiver = collector.field(MessageField::ReceiverUserId, &self.receiver_user_id, parse_id);
        let content = collector.field(MessageField::Content, &self.content, parse_string);
        collector.finish(INVALID_MESSAGE_MESSAGE, || {
            Some(NewMessage {
                sender_user_id,
                receiver_user_id: UserId::new(receiver?),
                content: content?,
                timestamp,
            })
        })
    }
}
