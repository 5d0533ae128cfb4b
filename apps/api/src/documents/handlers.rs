use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::documents::import::import_document;
use crate::documents::store::AddOutcome;
use crate::errors::AppError;
use crate::models::document::{Document, DocumentLabel, MAX_DOCUMENTS};
use crate::state::AppState;

/// A stored document without its full text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub index: usize,
    pub name: String,
    pub label: DocumentLabel,
    pub characters: usize,
}

impl DocumentSummary {
    fn new(index: usize, document: &Document) -> Self {
        Self {
            index,
            name: document.name.clone(),
            label: document.label,
            characters: document.content.chars().count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentSummary>,
    pub max: usize,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct FailedUpload {
    pub file: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub outcome: AddOutcome,
    pub failed: Vec<FailedUpload>,
}

#[derive(Debug, Deserialize)]
pub struct RelabelRequest {
    pub label: DocumentLabel,
}

/// GET /api/v1/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentList>, AppError> {
    let documents = state.documents.list().await?;
    Ok(Json(DocumentList {
        documents: documents
            .iter()
            .enumerate()
            .map(|(i, d)| DocumentSummary::new(i, d))
            .collect(),
        max: MAX_DOCUMENTS,
        labels: DocumentLabel::ALL.iter().map(|l| l.as_str()).collect(),
    }))
}

/// POST /api/v1/documents
/// Multipart; every part with a file name is imported.
pub async fn handle_upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut imported = Vec::new();
    let mut failed = Vec::new();
    let mut first_error = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;

        match import_document(&file_name, &bytes) {
            Ok(document) => imported.push(document),
            Err(e) => {
                warn!("Could not import {file_name}: {e}");
                failed.push(FailedUpload {
                    file: file_name,
                    error: e.to_string(),
                });
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if imported.is_empty() {
        return Err(match first_error {
            Some(e) => AppError::Import(e),
            None => AppError::Validation("No files uploaded".to_string()),
        });
    }

    let outcome = state.documents.add(imported).await?;
    info!(
        "Upload stored {} document(s); {} skipped, {} failed",
        outcome.added,
        outcome.skipped,
        failed.len()
    );
    Ok(Json(UploadResponse { outcome, failed }))
}

/// PATCH /api/v1/documents/:index
pub async fn handle_relabel_document(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<RelabelRequest>,
) -> Result<Json<DocumentSummary>, AppError> {
    let document = state.documents.relabel(index, req.label).await?;
    Ok(Json(DocumentSummary::new(index, &document)))
}

/// DELETE /api/v1/documents/:index
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    let removed = state.documents.remove(index).await?;
    info!("Removed document {}", removed.name);
    Ok(StatusCode::NO_CONTENT)
}
