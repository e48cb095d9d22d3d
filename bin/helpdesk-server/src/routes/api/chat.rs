use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::entities::{MessageKind, format_timestamp};
use crate::error::ServerError;
use crate::handlers;
use crate::schemas::chat::{ChatRequest, ChatResponse};
use crate::state::AppState;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MAX_MESSAGE_BYTES: usize = 8 * 1024;

#[derive(OpenApi)]
#[openapi(paths(chat), components(schemas(ChatRequest, ChatResponse)))]
pub struct ChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

/// Answer one user message.
///
/// Resolves (or starts) the conversation, classifies the message, composes
/// the reply from the catalog and stores both messages in one transaction.
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Message missing, not a string, or too long"),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(req) = payload.map_err(|e| {
        debug!(error = %e, "rejected chat body");
        ServerError::BadRequest(MESSAGE_REQUIRED.to_owned())
    })?;

    if req.message.len() > MAX_MESSAGE_BYTES {
        return Err(ServerError::BadRequest(format!(
            "Message is too long (max {MAX_MESSAGE_BYTES} bytes)"
        )));
    }

    let token = req
        .conversation_id
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let conversation = state.conversations.ensure_conversation(token).await?;

    let mut turn = conversation.begin_turn();
    turn.append_message(MessageKind::User, req.message.as_str());

    let classification = state.classifier.classify(&req.message).await;
    let analysis = classification.analysis();
    let reply = handlers::respond(state.store.as_ref(), analysis).await;
    turn.append_message(MessageKind::Assistant, reply.as_str());

    let committed = state.conversations.commit(turn).await?;
    info!(
        conversation_id = %committed.token,
        intent = %analysis.intent,
        confidence = analysis.confidence,
        fallback = classification.is_fallback(),
        "chat turn answered"
    );

    Ok(Json(ChatResponse {
        response: reply,
        conversation_id: committed.token,
        timestamp: format_timestamp(&committed.timestamp),
    }))
}
