mod config;
mod documents;
mod errors;
mod extraction;
mod generation;
mod history;
mod llm_client;
mod models;
mod routes;
mod settings;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::documents::DocumentStore;
use crate::extraction::PageReader;
use crate::history::HistoryStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::settings::SettingsStore;
use crate::state::AppState;
use crate::storage::{FileStore, KeyValueStore, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coldmail API v{}", env!("CARGO_PKG_VERSION"));

    // Synchronized store: settings
    let sync_store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Settings store: Redis");
            Arc::new(RedisStore::new(client, "coldmail"))
        }
        None => {
            let store = FileStore::open(config.data_dir.join("sync.json")).await?;
            info!("Settings store: {}", store.path().display());
            Arc::new(store)
        }
    };

    // Local store: documents and history
    let local = FileStore::open(config.data_dir.join("local.json")).await?;
    info!("Document/history store: {}", local.path().display());
    let local_store: Arc<dyn KeyValueStore> = Arc::new(local);

    let llm = LlmClient::new(config.llm_base_url.clone(), config.strict_response_shape);
    if let Some(base) = &config.llm_base_url {
        info!("LLM calls routed through {base}");
    }

    let pages = PageReader::new(Duration::from_secs(config.page_fetch_timeout_secs))?;

    let state = AppState {
        settings: SettingsStore::new(sync_store),
        documents: DocumentStore::new(local_store.clone()),
        history: HistoryStore::new(local_store),
        llm,
        pages,
        generation_gate: Arc::new(Mutex::new(())),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
