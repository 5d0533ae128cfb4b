/// LLM Client — the single point of entry for all provider API calls.
///
/// No other module talks to a vendor endpoint directly. One call per
/// generation: no retries, no timeout, no fallback to another provider.
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod providers;

pub use providers::{Provider, ProviderInfo};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{provider} network error: {source}")]
    Transport {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API Error [{status}]: {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{provider} returned a malformed response: {source}")]
    Parse {
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} returned an empty response")]
    EmptyContent { provider: Provider },
}

/// A fully resolved generation call: provider, bound model, credentials and prompt.
pub struct Completion<'a> {
    pub provider: Provider,
    pub model: &'a str,
    pub api_key: &'a str,
    pub prompt: &'a str,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    /// Replaces the vendor scheme+host when set (proxies, mock servers).
    base_url_override: Option<String>,
    /// Treat an unexpected response shape as an error instead of empty text.
    strict_response_shape: bool,
}

impl LlmClient {
    pub fn new(base_url_override: Option<String>, strict_response_shape: bool) -> Self {
        Self {
            client: Client::new(),
            base_url_override: base_url_override.map(|b| b.trim_end_matches('/').to_string()),
            strict_response_shape,
        }
    }

    pub fn endpoint(&self, provider: Provider, model: &str) -> String {
        match &self.base_url_override {
            Some(base) => format!("{base}{}", provider.endpoint_path(model)),
            None => provider.endpoint(model),
        }
    }

    /// Sends the prompt to the provider and returns the generated text.
    pub async fn complete(&self, completion: Completion<'_>) -> Result<String, LlmError> {
        let Completion {
            provider,
            model,
            api_key,
            prompt,
        } = completion;

        let request = provider.build_request(api_key, prompt).bind_model(model);
        let endpoint = self.endpoint(provider, model);
        debug!("POST {endpoint} (provider={}, model={model})", provider.id());

        let mut builder = self.client.post(&endpoint);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|source| LlmError::Transport { provider, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| LlmError::Transport { provider, source })?;

        if !status.is_success() {
            warn!("{} API returned {}", provider, status);
            let message = error_envelope_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "API request failed".to_string());
            return Err(LlmError::Api {
                provider,
                status: status.as_u16(),
                message,
            });
        }

        let data: Value =
            serde_json::from_str(&body).map_err(|source| LlmError::Parse { provider, source })?;
        let text = provider.parse_response(&data);

        if text.is_empty() {
            warn!("{} response did not contain generated text", provider);
            if self.strict_response_shape {
                return Err(LlmError::EmptyContent { provider });
            }
        }

        debug!("{} returned {} chars", provider, text.chars().count());
        Ok(text)
    }
}

/// Pulls `error.message` out of a vendor error body, if there is one.
fn error_envelope_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
