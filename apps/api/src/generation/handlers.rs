use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::extraction::PageSource;
use crate::generation::generator::{generate_for_page, GenerationError};
use crate::generation::hints::hint_for;
use crate::llm_client::{Provider, ProviderInfo};
use crate::models::history::HistoryEntry;
use crate::state::AppState;

/// Messages a client can post. Tagged by `action`, like the extension's runtime messages.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    GenerateEmail(PageSource),
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub email: String,
}

/// A failed message: one error string plus the friendly hint derived from it.
#[derive(Debug)]
pub struct MessageFailure {
    status: StatusCode,
    message: String,
}

impl MessageFailure {
    fn busy() -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: "An email is already being generated. Please wait for it to finish."
                .to_string(),
        }
    }
}

impl From<JsonRejection> for MessageFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid message: {}", rejection.body_text()),
        }
    }
}

impl From<GenerationError> for MessageFailure {
    fn from(err: GenerationError) -> Self {
        let status = match &err {
            GenerationError::MissingApiKey | GenerationError::InvalidProvider(_) => {
                StatusCode::BAD_REQUEST
            }
            GenerationError::Scrape(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GenerationError::Llm(_) => StatusCode::BAD_GATEWAY,
            GenerationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for MessageFailure {
    fn into_response(self) -> Response {
        let hint = hint_for(&self.message);
        let body = Json(json!({
            "error": self.message,
            "hint": hint,
        }));
        (self.status, body).into_response()
    }
}

/// POST /api/v1/messages
pub async fn handle_message(
    State(state): State<AppState>,
    message: Result<Json<Message>, JsonRejection>,
) -> Result<Json<EmailResponse>, MessageFailure> {
    let Json(message) = message.map_err(|rejection| {
        warn!("Rejected message: {}", rejection.body_text());
        MessageFailure::from(rejection)
    })?;
    match message {
        Message::GenerateEmail(source) => generate(state, source).await,
    }
}

async fn generate(state: AppState, source: PageSource) -> Result<Json<EmailResponse>, MessageFailure> {
    let Ok(_guard) = state.generation_gate.try_lock() else {
        warn!("Rejected generation for {}: another one is in flight", source.url);
        return Err(MessageFailure::busy());
    };

    let generated = generate_for_page(
        &state.settings,
        &state.documents,
        &state.llm,
        &state.pages,
        source,
    )
    .await
    .map_err(|e| {
        error!("Generation failed: {e}");
        MessageFailure::from(e)
    })?;

    if generated.email.is_empty() {
        warn!("{} returned no text; nothing recorded", generated.provider);
    } else {
        let entry = HistoryEntry::new(
            generated.email.clone(),
            generated.page.url.clone(),
            generated.page.title.clone().unwrap_or_default(),
        );
        // History is best-effort; the email is returned either way.
        if let Err(e) = state.history.record(entry).await {
            error!("Failed to record history: {e}");
        }
    }

    info!(
        "Generated {} chars with {} ({})",
        generated.email.chars().count(),
        generated.provider,
        generated.model
    );
    Ok(Json(EmailResponse {
        email: generated.email,
    }))
}

/// GET /api/v1/providers
pub async fn handle_list_providers() -> Json<Vec<ProviderInfo>> {
    Json(Provider::ALL.iter().map(|p| p.info()).collect())
}
