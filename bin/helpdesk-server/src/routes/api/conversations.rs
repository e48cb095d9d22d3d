use std::sync::Arc;

use axum::extract::{Path, State};
use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::conversation::DEFAULT_LIST_LIMIT;
use crate::error::ServerError;
use crate::middleware::auth;
use crate::schemas::conversation::{
    ConversationListResponse, ConversationView, HistoryResponse, MessageView,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_history, list_conversations),
    components(schemas(
        HistoryResponse,
        MessageView,
        ConversationListResponse,
        ConversationView,
        crate::entities::MessageKind
    ))
)]
pub struct ConversationsApi;

/// The listing sits behind the optional admin token; transcripts do not.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let listing = Router::new()
        .route("/conversations", get(list_conversations))
        .route_layer(middleware::from_fn_with_state(state, auth::require_admin_token));

    Router::new()
        .route("/conversations/{id}/history", get(get_history))
        .merge(listing)
}

#[utoipa::path(
    get,
    path = "/api/conversations/{id}/history",
    tag = "conversations",
    params(("id" = String, Path, description = "Conversation token returned by /api/chat")),
    responses(
        (status = 200, description = "Messages, oldest first", body = HistoryResponse),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let history = state.conversations.get_history(&id).await?;
    Ok(Json(HistoryResponse {
        conversation_id: id,
        messages: history.iter().map(|h| h.to_view()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "conversations",
    responses(
        (status = 200, description = "Up to 50 conversations, most recently updated first", body = ConversationListResponse),
        (status = 401, description = "Admin token required"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConversationListResponse>, ServerError> {
    let summaries = state.conversations.list_recent(DEFAULT_LIST_LIMIT).await?;
    Ok(Json(ConversationListResponse {
        conversations: summaries.iter().map(|s| s.to_view()).collect(),
    }))
}
