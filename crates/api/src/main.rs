//! Grievance intake API server.

use std::sync::Arc;

use api::{AppState, Config, SessionBackend};
use database::Database;
use gemini_classifier::{
    GeminiClassifier, GeminiClient, GeminiConfig, GeminiTranslator, DEFAULT_CLASSIFIER_PROMPT,
};
use intake::{
    ChatOrchestrator, DatabaseComplaintSink, DatabaseDirectory, MemorySessionStore,
    SessionStore, SqliteSessionStore, TextClassifier,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting grievance API");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let chat = build_orchestrator(&config, &db);
    let state = AppState::new(db, chat);

    let app = api::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!(addr = %config.addr, "Grievance API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_orchestrator(config: &Config, db: &Database) -> ChatOrchestrator {
    let sink = Arc::new(DatabaseComplaintSink::new(db.clone()));

    let gemini = GeminiConfig::from_env().and_then(|gemini_config| {
        let template = gemini_config
            .prompt_template
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASSIFIER_PROMPT.to_string());
        let client = GeminiClient::new(gemini_config)?;
        Ok((client, template))
    });

    let chat = match gemini {
        Ok((client, template)) => {
            info!(model = %client.config().model, "Gemini classifier enabled");
            let classifier = GeminiClassifier::with_client(client.clone(), template);
            ChatOrchestrator::new(TextClassifier::new(Arc::new(classifier)), sink)
                .with_translator(Arc::new(GeminiTranslator::new(client)))
        }
        Err(e) => {
            warn!("Gemini unavailable, classifying by keywords only: {}", e);
            ChatOrchestrator::new(TextClassifier::keyword_only(), sink)
        }
    };

    let store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Memory => {
            let store = Arc::new(MemorySessionStore::with_ttl(config.session_ttl));
            spawn_purge(store.clone(), config.session_ttl);
            store
        }
        SessionBackend::Sqlite => {
            Arc::new(SqliteSessionStore::with_ttl(db.clone(), config.session_ttl))
        }
    };
    info!(
        backend = ?config.session_backend,
        ttl_secs = config.session_ttl.as_secs(),
        "Session store ready"
    );

    chat.with_store(store)
        .with_directory(Arc::new(DatabaseDirectory::new(db.clone())))
}

/// Periodically drop idle in-memory sessions.
fn spawn_purge(store: Arc<MemorySessionStore>, ttl: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(ttl);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                debug!(purged, "Purged idle chat sessions");
            }
        }
    });
}
