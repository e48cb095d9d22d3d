mod chat;
mod conversations;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::state::AppState;

/// Routes nested under `/api`.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(chat::router())
        .merge(conversations::router(state))
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = chat::ChatApi::openapi();
    doc.merge(conversations::ConversationsApi::openapi());
    doc
}
