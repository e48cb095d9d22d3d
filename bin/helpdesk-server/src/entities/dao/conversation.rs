use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Who wrote a message.  Stored as `"user"` / `"assistant"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
}

/// A row in the `conversations` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub id: String,
    /// The opaque token clients use as `conversation_id`.
    pub session_id: String,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row in the `messages` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub id: String,
    pub conversation_id: String,
    /// 1-based position within the conversation.
    pub seq: i64,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message not yet written; the store assigns its `seq`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub id: String,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Everything one chat turn writes, persisted atomically.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub conversation: ConversationRecord,
    /// Insert the conversation row before the messages.
    pub is_new: bool,
    pub messages: Vec<NewMessage>,
}

/// A conversation listing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: i64,
}
