pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::generation::handlers as generation;
use crate::history::handlers as history;
use crate::settings::handlers as settings;
use crate::state::AppState;

/// Uploads carry whole PDFs; the axum default of 2 MB is too small.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Messages (popup button and keyboard shortcut)
        .route("/api/v1/messages", post(generation::handle_message))
        .route("/api/v1/providers", get(generation::handle_list_providers))
        // Options page
        .route(
            "/api/v1/settings",
            get(settings::handle_get_settings).put(settings::handle_put_settings),
        )
        .route(
            "/api/v1/documents",
            get(documents::handle_list_documents)
                .post(documents::handle_upload_documents)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/documents/:index",
            delete(documents::handle_delete_document).patch(documents::handle_relabel_document),
        )
        // History
        .route(
            "/api/v1/history",
            get(history::handle_list_history).delete(history::handle_clear_history),
        )
        .route(
            "/api/v1/history/:index",
            delete(history::handle_delete_history_entry),
        )
        .with_state(state)
}
