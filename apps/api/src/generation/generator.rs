//! Email Generation — orchestrates one generation, start to finish.
//!
//! Flow: load settings + documents → validate → read page → build prompt →
//!       one provider call → generated text.
//!
//! Strictly sequential. Nothing here retries; the user re-triggers instead.

use thiserror::Error;
use tracing::info;

use crate::documents::DocumentStore;
use crate::extraction::{PageReader, PageSource, ScrapeError};
use crate::generation::prompt_builder::build_prompt;
use crate::llm_client::{Completion, LlmClient, LlmError, Provider};
use crate::models::document::{Document, DocumentLabel};
use crate::models::page::PageData;
use crate::models::settings::Settings;
use crate::settings::SettingsStore;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key not configured. Please go to Settings.")]
    MissingApiKey,

    #[error("Invalid provider selected: {0}")]
    InvalidProvider(String),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to read storage: {0}")]
    Storage(#[from] StorageError),
}

/// Everything a generation reads from storage, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct GenerationInputs {
    pub settings: Settings,
    pub documents: Vec<Document>,
}

impl GenerationInputs {
    pub async fn load(
        settings: &SettingsStore,
        documents: &DocumentStore,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            settings: settings.load().await?,
            documents: documents.list().await?,
        })
    }

    /// Uploaded documents, or the legacy plain-text resume when there are none.
    pub fn prompt_documents(&self) -> Vec<Document> {
        match (&self.settings.resume, self.documents.is_empty()) {
            (Some(resume), true) => vec![Document {
                name: "resume".to_string(),
                label: DocumentLabel::Resume,
                content: resume.clone(),
            }],
            _ => self.documents.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedEmail {
    pub email: String,
    pub provider: Provider,
    pub model: &'static str,
    pub page: PageData,
}

/// Validates settings before anything touches the network.
fn resolve_provider(settings: &Settings) -> Result<Provider, GenerationError> {
    if !settings.has_api_key() {
        return Err(GenerationError::MissingApiKey);
    }
    settings.provider().ok_or_else(|| {
        let id = if settings.provider.is_empty() {
            "(none)".to_string()
        } else {
            settings.provider.clone()
        };
        GenerationError::InvalidProvider(id)
    })
}

/// Runs one generation against `source` with already-loaded inputs.
pub async fn generate_email(
    llm: &LlmClient,
    pages: &PageReader,
    inputs: &GenerationInputs,
    source: PageSource,
) -> Result<GeneratedEmail, GenerationError> {
    // Step 1: fail fast on configuration
    let settings = &inputs.settings;
    let provider = resolve_provider(settings)?;
    let model = provider.resolve_model(Some(settings.model.as_str()).filter(|m| !m.is_empty()));

    // Step 2: read the page
    let page = pages.read(source).await?;

    // Step 3: prompt
    let documents = inputs.prompt_documents();
    let prompt = build_prompt(&page, &documents, &settings.personal_note);
    info!(
        "Generating email for {} via {} ({model}), {} document(s), prompt {} chars",
        page.url,
        provider.id(),
        documents.len(),
        prompt.chars().count()
    );

    // Step 4: single provider call
    let email = llm
        .complete(Completion {
            provider,
            model,
            api_key: settings.api_key.trim(),
            prompt: &prompt,
        })
        .await?;

    Ok(GeneratedEmail {
        email,
        provider,
        model,
        page,
    })
}

/// Loads inputs from the stores and runs [`generate_email`].
pub async fn generate_for_page(
    settings: &SettingsStore,
    documents: &DocumentStore,
    llm: &LlmClient,
    pages: &PageReader,
    source: PageSource,
) -> Result<GeneratedEmail, GenerationError> {
    let inputs = GenerationInputs::load(settings, documents).await?;
    generate_email(llm, pages, &inputs, source).await
}
