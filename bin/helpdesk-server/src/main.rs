//! helpdesk-server – entry point.
//!
//! Startup order:
//! 1. Load `.env`, then parse configuration from environment variables.
//! 2. Initialise structured tracing (JSON when `HELPDESK_LOG_JSON` is set).
//! 3. Connect to the database and run pending migrations.
//! 4. Build the intent classifier (keyword-only without `GROQ_API_KEY`).
//! 5. Build the Axum router and serve with graceful shutdown.

mod config;
mod conversation;
mod entities;
mod error;
mod handlers;
mod middleware;
mod routes;
mod schemas;
mod state;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use helpdesk_intent::{ChatCompletionsModel, IntentClassifier, LanguageModel};
use tracing::{info, warn};

use crate::config::Config;
use crate::conversation::ConversationManager;
use crate::entities::AnyStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv = dotenvy::dotenv();
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: HELPDESK_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "helpdesk-server starting");
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }
    if cfg.uses_default_secret() {
        warn!("SECRET_KEY is not set; using the development default");
    }

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = Arc::new(AnyStore::connect(&cfg.database_url).await?);
    info!(database_url = %cfg.redacted_database_url(), "database ready");

    // ── 4. Intent classifier ───────────────────────────────────────────────────
    let model: Option<Arc<dyn LanguageModel>> = match cfg.llm_api_key.as_deref() {
        Some(key) => {
            let model = ChatCompletionsModel::new(
                key,
                cfg.llm_base_url.clone(),
                cfg.llm_model.clone(),
                cfg.llm_timeout,
            )?;
            info!(model = %model.model(), base_url = %cfg.llm_base_url, "intent model configured");
            Some(Arc::new(model))
        }
        None => {
            warn!("GROQ_API_KEY is not set; classifying by keywords only");
            None
        }
    };

    // ── 5. Shared application state ────────────────────────────────────────────
    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        conversations: ConversationManager::new(Arc::clone(&store)),
        store,
        classifier: Arc::new(IntentClassifier::new(model)),
    });

    // ── 6. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("helpdesk-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
