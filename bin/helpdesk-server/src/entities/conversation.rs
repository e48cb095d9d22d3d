use std::future::Future;
use std::str::FromStr;

use crate::entities::dao::{
    ConversationRecord, ConversationSummary, MessageKind, MessageRecord, TurnRecord,
};
use crate::entities::{AnyStore, format_timestamp, stored_timestamp};

pub trait ConversationStore: Send + Sync + 'static {
    /// Look a conversation up by its client-facing token.
    fn find_conversation(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Option<ConversationRecord>, sqlx::Error>> + Send;

    /// Messages of one conversation, oldest first.
    fn list_messages(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;

    /// Most recently updated conversations first, with message counts.
    fn list_recent(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<ConversationSummary>, sqlx::Error>> + Send;

    /// Write a turn in one transaction: the conversation row if new (else an
    /// `updated_at` bump that never moves backwards), then the messages.
    fn save_turn(&self, turn: &TurnRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

type ConversationRow = (String, String, Option<i64>, String, String);
type MessageRow = (String, String, i64, String, String, String);

impl ConversationStore for AnyStore {
    async fn find_conversation(
        &self,
        session_id: &str,
    ) -> Result<Option<ConversationRecord>, sqlx::Error> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "SELECT id, session_id, user_id, created_at, updated_at \
             FROM conversations WHERE session_id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(
            |(id, session_id, user_id, created_at, updated_at)| ConversationRecord {
                id,
                session_id,
                user_id,
                created_at: stored_timestamp(&created_at),
                updated_at: stored_timestamp(&updated_at),
            },
        ))
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, sqlx::Error> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, conversation_id, seq, message_type, content, created_at \
             FROM messages WHERE conversation_id = ? ORDER BY seq ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, conversation_id, seq, kind, content, created_at)| {
                let kind = MessageKind::from_str(&kind).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "message_type".into(),
                    source: Box::new(e),
                })?;
                Ok(MessageRecord {
                    id,
                    conversation_id,
                    seq,
                    kind,
                    content,
                    created_at: stored_timestamp(&created_at),
                })
            })
            .collect()
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        let rows: Vec<(String, String, String, i64)> = sqlx::query_as(
            "SELECT c.session_id, c.created_at, c.updated_at, COUNT(m.id) \
             FROM conversations c LEFT JOIN messages m ON m.conversation_id = c.id \
             GROUP BY c.id, c.session_id, c.created_at, c.updated_at \
             ORDER BY c.updated_at DESC, c.created_at DESC \
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(
                |(session_id, created_at, updated_at, message_count)| ConversationSummary {
                    session_id,
                    created_at: stored_timestamp(&created_at),
                    updated_at: stored_timestamp(&updated_at),
                    message_count,
                },
            )
            .collect())
    }

    async fn save_turn(&self, turn: &TurnRecord) -> Result<(), sqlx::Error> {
        let conversation = &turn.conversation;
        let updated_at = turn
            .messages
            .iter()
            .map(|m| m.created_at)
            .max()
            .unwrap_or(conversation.updated_at);
        let mut tx = self.pool.begin().await?;

        // Write before reading `seq`: concurrent turns on one conversation
        // queue on the write lock (SQLite) or the conversation row (MySQL).
        if turn.is_new {
            sqlx::query(
                "INSERT INTO conversations (id, session_id, user_id, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&conversation.id)
            .bind(&conversation.session_id)
            .bind(conversation.user_id)
            .bind(format_timestamp(&conversation.created_at))
            .bind(format_timestamp(&updated_at))
            .execute(&mut *tx)
            .await?;
        } else {
            // Fixed-width timestamps compare correctly as text.
            let updated_at = format_timestamp(&updated_at);
            sqlx::query(
                "UPDATE conversations \
                 SET updated_at = CASE WHEN updated_at < ? THEN ? ELSE updated_at END \
                 WHERE id = ?",
            )
            .bind(&updated_at)
            .bind(&updated_at)
            .bind(&conversation.id)
            .execute(&mut *tx)
            .await?;
        }

        let (last_seq,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(seq), 0) FROM messages WHERE conversation_id = ?",
        )
        .bind(&conversation.id)
        .fetch_one(&mut *tx)
        .await?;

        for (offset, msg) in turn.messages.iter().enumerate() {
            sqlx::query(
                "INSERT INTO messages (id, conversation_id, seq, message_type, content, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&msg.id)
            .bind(&conversation.id)
            .bind(last_seq + offset as i64 + 1)
            .bind(msg.kind.as_ref())
            .bind(&msg.content)
            .bind(format_timestamp(&msg.created_at))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}
