use std::sync::Arc;

use tokio::sync::Mutex;

use crate::documents::DocumentStore;
use crate::extraction::PageReader;
use crate::history::HistoryStore;
use crate::llm_client::LlmClient;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsStore,
    pub documents: DocumentStore,
    pub history: HistoryStore,
    pub llm: LlmClient,
    pub pages: PageReader,
    /// Held for the duration of one generation. A second trigger is turned away.
    pub generation_gate: Arc<Mutex<()>>,
}
