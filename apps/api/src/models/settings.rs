use serde::{Deserialize, Serialize};

use crate::llm_client::Provider;

/// User settings, kept in the synchronized store under one key per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub personal_note: String,
    /// Plain-text resume from before documents existed. Read-only from the API's side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
}

/// What `GET /api/v1/settings` returns. The key itself never leaves the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub provider: String,
    pub model: String,
    pub personal_note: String,
    pub api_key_configured: bool,
    pub api_key_preview: Option<String>,
}

impl Settings {
    /// The configured provider, if the id is one we know.
    pub fn provider(&self) -> Option<Provider> {
        self.provider.parse().ok()
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn view(&self) -> SettingsView {
        SettingsView {
            provider: self.provider.clone(),
            model: self.model.clone(),
            personal_note: self.personal_note.clone(),
            api_key_configured: self.has_api_key(),
            api_key_preview: self.has_api_key().then(|| mask_key(&self.api_key)),
        }
    }
}

/// Keeps the last four characters: `sk-...abcd` becomes `...abcd`.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 4 {
        return "...".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("...{tail}")
}
