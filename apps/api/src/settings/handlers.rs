use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::Provider;
use crate::models::settings::{Settings, SettingsView};
use crate::state::AppState;

/// Body of `PUT /api/v1/settings`. An absent or blank `apiKey` keeps the stored one
/// as long as the provider does not change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub api_key: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub personal_note: String,
}

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsView>, AppError> {
    let settings = state.settings.load().await?;
    Ok(Json(settings.view()))
}

/// PUT /api/v1/settings
pub async fn handle_put_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, AppError> {
    let current = state.settings.load().await?;
    let settings = apply_update(current, update)?;
    state.settings.save(&settings).await?;
    info!(
        "Settings saved (provider={}, model={})",
        settings.provider, settings.model
    );
    Ok(Json(settings.view()))
}

/// Validates an update and merges it over the stored settings.
fn apply_update(current: Settings, update: SettingsUpdate) -> Result<Settings, AppError> {
    let provider: Provider = update
        .provider
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown provider: {}", update.provider)))?;

    // A stored key belongs to the stored provider; switching vendors needs a new one.
    let same_provider = current.provider() == Some(provider);
    let api_key = match update.api_key.map(|k| k.trim().to_string()) {
        Some(key) if !key.is_empty() => key,
        _ if same_provider => current.api_key.trim().to_string(),
        _ => String::new(),
    };
    if api_key.is_empty() {
        return Err(AppError::Validation("Please enter your API key".to_string()));
    }

    let requested = update.model.trim();
    let model = provider.resolve_model((!requested.is_empty()).then_some(requested));

    Ok(Settings {
        api_key,
        provider: provider.id().to_string(),
        model: model.to_string(),
        personal_note: update.personal_note.trim().to_string(),
        resume: current.resume,
    })
}
