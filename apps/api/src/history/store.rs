use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::models::history::{HistoryEntry, MAX_HISTORY};
use crate::storage::{get_typed, set_typed, KeyValueStore, StorageError};

const KEY_HISTORY: &str = "emailHistory";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("No history entry at index {0}")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Generated emails, newest first, capped at [`MAX_HISTORY`].
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        Ok(get_typed(self.kv.as_ref(), KEY_HISTORY)
            .await?
            .unwrap_or_default())
    }

    /// Prepends `entry` and drops whatever falls past the cap.
    pub async fn record(&self, entry: HistoryEntry) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut history = self.list().await?;
        push_bounded(&mut history, entry);
        self.write(&history).await?;
        debug!("History now holds {} entries", history.len());
        Ok(history)
    }

    pub async fn delete(&self, index: usize) -> Result<HistoryEntry, HistoryError> {
        let mut history = self.list().await?;
        if index >= history.len() {
            return Err(HistoryError::IndexOutOfRange(index));
        }
        let removed = history.remove(index);
        self.write(&history).await?;
        Ok(removed)
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.remove(KEY_HISTORY).await
    }

    async fn write(&self, history: &[HistoryEntry]) -> Result<(), StorageError> {
        set_typed(self.kv.as_ref(), KEY_HISTORY, history).await
    }
}

fn push_bounded(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.insert(0, entry);
    history.truncate(MAX_HISTORY);
}
