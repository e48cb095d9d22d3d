use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::conversation::HistoryEntry;
use crate::entities::{ConversationSummary, MessageKind, format_timestamp};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageView {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub conversation_id: String,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationView {
    pub conversation_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationView>,
}

impl HistoryEntry {
    pub fn to_view(&self) -> MessageView {
        MessageView {
            kind: self.kind,
            content: self.content.clone(),
            timestamp: format_timestamp(&self.timestamp),
        }
    }
}

impl ConversationSummary {
    pub fn to_view(&self) -> ConversationView {
        ConversationView {
            conversation_id: self.session_id.clone(),
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
            message_count: self.message_count,
        }
    }
}
