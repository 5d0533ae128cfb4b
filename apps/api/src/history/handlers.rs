use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::history::HistoryEntry;
use crate::state::AppState;

/// One history row as the popup lists it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub index: usize,
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub source_name: String,
    pub preview: String,
    pub time_ago: String,
}

impl HistoryItem {
    fn new(index: usize, entry: HistoryEntry, now: DateTime<Utc>) -> Self {
        Self {
            index,
            source_name: entry.source_name(),
            preview: entry.preview(),
            time_ago: entry.time_ago(now),
            entry,
        }
    }
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryItem>>, AppError> {
    let now = Utc::now();
    let items = state
        .history
        .list()
        .await?
        .into_iter()
        .enumerate()
        .map(|(i, entry)| HistoryItem::new(i, entry, now))
        .collect();
    Ok(Json(items))
}

/// DELETE /api/v1/history/:index
pub async fn handle_delete_history_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    state.history.delete(index).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
