//! Conversation manager: token lookup, per-turn unit of work, transcripts.
//!
//! A chat turn is built in memory as a [`Turn`] and written by [`commit`]
//! in a single store transaction.  A brand-new conversation only reaches the
//! database together with its first turn, so a request that fails half-way
//! leaves nothing behind.
//!
//! [`commit`]: ConversationManager::commit

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    ConversationRecord, ConversationStore, ConversationSummary, MessageKind, MessageRecord,
    NewMessage, TurnRecord,
};
use crate::error::ServerError;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const CONVERSATION_NOT_FOUND: &str = "Conversation not found";

/// A conversation resolved for the current request.
#[derive(Debug, Clone)]
pub struct Conversation {
    record: ConversationRecord,
    is_new: bool,
}

impl Conversation {
    /// The client-facing `conversation_id`.
    pub fn token(&self) -> &str {
        &self.record.session_id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Start collecting the messages of one chat turn.
    pub fn begin_turn(self) -> Turn {
        Turn {
            conversation: self,
            messages: Vec::with_capacity(2),
        }
    }
}

/// Messages of one chat turn, not yet persisted.
#[derive(Debug)]
pub struct Turn {
    conversation: Conversation,
    messages: Vec<NewMessage>,
}

impl Turn {
    /// Append a message stamped with the current server time.  Timestamps
    /// never go backwards within a turn.
    pub fn append_message(&mut self, kind: MessageKind, content: impl Into<String>) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = self
            .messages
            .last()
            .map_or(now, |prev| prev.created_at.max(now));
        self.messages.push(NewMessage {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            created_at,
        });
        created_at
    }
}

/// Result of a committed turn.
#[derive(Debug, Clone)]
pub struct CommittedTurn {
    pub token: String,
    /// Timestamp of the last message written.
    pub timestamp: DateTime<Utc>,
}

/// One entry of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageRecord> for HistoryEntry {
    fn from(m: MessageRecord) -> Self {
        Self {
            kind: m.kind,
            content: m.content,
            timestamp: m.created_at,
        }
    }
}

#[derive(Debug)]
pub struct ConversationManager<S> {
    store: Arc<S>,
}

impl<S> Clone for ConversationManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ConversationStore> ConversationManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve `token` to its conversation, or mint a new one when `None`.
    pub async fn ensure_conversation(&self, token: Option<&str>) -> Result<Conversation, ServerError> {
        match token {
            Some(token) => {
                let record = self
                    .store
                    .find_conversation(token)
                    .await?
                    .ok_or_else(|| ServerError::NotFound(CONVERSATION_NOT_FOUND.to_owned()))?;
                Ok(Conversation { record, is_new: false })
            }
            None => {
                let now = Utc::now();
                let record = ConversationRecord {
                    id: Uuid::new_v4().to_string(),
                    session_id: Uuid::new_v4().to_string(),
                    user_id: None,
                    created_at: now,
                    updated_at: now,
                };
                debug!(conversation_id = %record.session_id, "new conversation");
                Ok(Conversation { record, is_new: true })
            }
        }
    }

    /// Persist `turn` atomically.
    pub async fn commit(&self, turn: Turn) -> Result<CommittedTurn, ServerError> {
        let Turn { conversation, messages } = turn;
        let timestamp = messages
            .last()
            .map_or_else(Utc::now, |m| m.created_at);
        let record = TurnRecord {
            conversation: conversation.record,
            is_new: conversation.is_new,
            messages,
        };
        self.store.save_turn(&record).await?;
        debug!(
            conversation_id = %record.conversation.session_id,
            messages = record.messages.len(),
            created = record.is_new,
            "turn committed"
        );
        Ok(CommittedTurn {
            token: record.conversation.session_id,
            timestamp,
        })
    }

    /// Transcript of `token`, oldest message first.
    pub async fn get_history(&self, token: &str) -> Result<Vec<HistoryEntry>, ServerError> {
        let record = self
            .store
            .find_conversation(token)
            .await?
            .ok_or_else(|| ServerError::NotFound(CONVERSATION_NOT_FOUND.to_owned()))?;
        let messages = self.store.list_messages(&record.id).await?;
        Ok(messages.into_iter().map(HistoryEntry::from).collect())
    }

    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ConversationSummary>, ServerError> {
        Ok(self.store.list_recent(limit).await?)
    }
}
