//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use helpdesk_intent::IntentClassifier;

use crate::config::Config;
use crate::conversation::ConversationManager;
use crate::entities::AnyStore;

/// Built once at startup and dropped at shutdown.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Catalog reads for the query handlers.
    pub store: Arc<AnyStore>,
    /// Conversation lookups and turn persistence, over the same store.
    pub conversations: ConversationManager<AnyStore>,
    pub classifier: Arc<IntentClassifier>,
}
