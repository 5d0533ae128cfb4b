use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::document::{Document, DocumentLabel, MAX_DOCUMENTS};
use crate::storage::{get_typed, set_typed, KeyValueStore, StorageError};

const KEY_DOCUMENTS: &str = "documents";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Maximum {} documents allowed", MAX_DOCUMENTS)]
    LimitReached,

    #[error("No document at index {0}")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of adding a batch of uploads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOutcome {
    pub added: usize,
    /// Uploads dropped because the store was full.
    pub skipped: usize,
    pub total: usize,
}

/// User documents, persisted in the local store.
#[derive(Clone)]
pub struct DocumentStore {
    kv: Arc<dyn KeyValueStore>,
}

impl DocumentStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn list(&self) -> Result<Vec<Document>, StorageError> {
        Ok(get_typed(self.kv.as_ref(), KEY_DOCUMENTS)
            .await?
            .unwrap_or_default())
    }

    /// Adds as many of `incoming` as there are free slots.
    /// A store that is already full rejects the whole batch.
    pub async fn add(&self, incoming: Vec<Document>) -> Result<AddOutcome, DocumentError> {
        let mut documents = self.list().await?;
        let free = MAX_DOCUMENTS.saturating_sub(documents.len());
        if free == 0 {
            return Err(DocumentError::LimitReached);
        }

        let skipped = incoming.len().saturating_sub(free);
        let added = incoming.len() - skipped;
        documents.extend(incoming.into_iter().take(free));
        self.write(&documents).await?;

        info!("Added {added} document(s), skipped {skipped}");
        Ok(AddOutcome {
            added,
            skipped,
            total: documents.len(),
        })
    }

    pub async fn relabel(
        &self,
        index: usize,
        label: DocumentLabel,
    ) -> Result<Document, DocumentError> {
        let mut documents = self.list().await?;
        let document = documents
            .get_mut(index)
            .ok_or(DocumentError::IndexOutOfRange(index))?;
        document.label = label;
        let updated = document.clone();
        self.write(&documents).await?;
        Ok(updated)
    }

    pub async fn remove(&self, index: usize) -> Result<Document, DocumentError> {
        let mut documents = self.list().await?;
        if index >= documents.len() {
            return Err(DocumentError::IndexOutOfRange(index));
        }
        let removed = documents.remove(index);
        self.write(&documents).await?;
        Ok(removed)
    }

    async fn write(&self, documents: &[Document]) -> Result<(), StorageError> {
        set_typed(self.kv.as_ref(), KEY_DOCUMENTS, documents).await
    }
}
