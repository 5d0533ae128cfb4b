//! Provider table — the five LLM vendors a user can pick in settings.
//!
//! Each variant knows its endpoint, auth header convention, request body
//! shape and where the generated text lives in the response JSON.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const OPENAI_API_BASE: &str = "https://api.openai.com";
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
const MISTRAL_API_BASE: &str = "https://api.mistral.ai";
const GROQ_API_BASE: &str = "https://api.groq.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// A supported LLM vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Gemini,
    OpenAi,
    Anthropic,
    Mistral,
    Groq,
}

/// Headers and JSON body for a single generation call.
///
/// Providers that expect the model name inside the body leave `"model": null`
/// until [`ProviderRequest::bind_model`] fills it in.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl ProviderRequest {
    /// Replaces the `"model": null` placeholder with the selected model.
    /// Bodies without a placeholder (Gemini) are left untouched.
    pub fn bind_model(mut self, model: &str) -> Self {
        if let Some(slot) = self.body.get_mut("model") {
            if slot.is_null() {
                *slot = Value::String(model.to_string());
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl fmt::Display for UnknownProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown provider '{}'", self.0)
    }
}

impl std::error::Error for UnknownProvider {}

/// Catalogue entry served to the options UI.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub models: &'static [&'static str],
    pub default_model: &'static str,
    pub key_placeholder: &'static str,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Gemini,
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Mistral,
        Provider::Groq,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Mistral => "mistral",
            Provider::Groq => "groq",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Google Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Mistral => "Mistral AI",
            Provider::Groq => "Groq",
        }
    }

    /// Models offered for this provider, in display order.
    pub fn models(self) -> &'static [&'static str] {
        match self {
            Provider::Gemini => &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"],
            Provider::OpenAi => &["gpt-4o", "gpt-4o-mini", "o1", "o1-mini", "o3-mini"],
            Provider::Anthropic => &[
                "claude-sonnet-4-20250514",
                "claude-3-5-sonnet-20241022",
                "claude-3-5-haiku-20241022",
            ],
            Provider::Mistral => &[
                "mistral-large-latest",
                "mistral-small-latest",
                "codestral-latest",
            ],
            Provider::Groq => &[
                "llama-3.3-70b-versatile",
                "llama-3.1-8b-instant",
                "mixtral-8x7b-32768",
            ],
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.0-flash",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-sonnet-4-20250514",
            Provider::Mistral => "mistral-large-latest",
            Provider::Groq => "llama-3.3-70b-versatile",
        }
    }

    pub fn key_placeholder(self) -> &'static str {
        match self {
            Provider::Gemini => "AIza...",
            Provider::OpenAi => "sk-...",
            Provider::Anthropic => "sk-ant-...",
            Provider::Mistral => "...",
            Provider::Groq => "gsk_...",
        }
    }

    /// Returns `requested` if it is one of this provider's models, else the default.
    pub fn resolve_model(self, requested: Option<&str>) -> &'static str {
        requested
            .and_then(|m| self.models().iter().copied().find(|known| *known == m))
            .unwrap_or_else(|| self.default_model())
    }

    /// Scheme and host of the vendor API.
    pub fn api_base(self) -> &'static str {
        match self {
            Provider::Gemini => GEMINI_API_BASE,
            Provider::OpenAi => OPENAI_API_BASE,
            Provider::Anthropic => ANTHROPIC_API_BASE,
            Provider::Mistral => MISTRAL_API_BASE,
            Provider::Groq => GROQ_API_BASE,
        }
    }

    /// Path component of the generation endpoint. Gemini carries the model in the URL.
    pub fn endpoint_path(self, model: &str) -> String {
        match self {
            Provider::Gemini => format!("/v1beta/models/{model}:generateContent"),
            Provider::OpenAi | Provider::Mistral => "/v1/chat/completions".to_string(),
            Provider::Anthropic => "/v1/messages".to_string(),
            Provider::Groq => "/openai/v1/chat/completions".to_string(),
        }
    }

    pub fn endpoint(self, model: &str) -> String {
        format!("{}{}", self.api_base(), self.endpoint_path(model))
    }

    pub fn build_request(self, api_key: &str, prompt: &str) -> ProviderRequest {
        let content_type = ("Content-Type", "application/json".to_string());
        match self {
            Provider::Gemini => ProviderRequest {
                headers: vec![content_type, ("x-goog-api-key", api_key.to_string())],
                body: json!({ "contents": [{ "parts": [{ "text": prompt }] }] }),
            },
            Provider::Anthropic => ProviderRequest {
                headers: vec![
                    content_type,
                    ("x-api-key", api_key.to_string()),
                    ("anthropic-version", ANTHROPIC_VERSION.to_string()),
                ],
                body: json!({
                    "model": null,
                    "max_tokens": ANTHROPIC_MAX_TOKENS,
                    "messages": [{ "role": "user", "content": prompt }]
                }),
            },
            Provider::OpenAi | Provider::Mistral | Provider::Groq => ProviderRequest {
                headers: vec![content_type, ("Authorization", format!("Bearer {api_key}"))],
                body: json!({
                    "model": null,
                    "messages": [{ "role": "user", "content": prompt }]
                }),
            },
        }
    }

    /// Extracts the generated text. Any missing field along the path yields `""`.
    pub fn parse_response(self, data: &Value) -> String {
        let text = match self {
            Provider::Gemini => data
                .pointer("/candidates/0/content/parts/0/text")
                .and_then(Value::as_str),
            Provider::Anthropic => data.pointer("/content/0/text").and_then(Value::as_str),
            Provider::OpenAi | Provider::Mistral | Provider::Groq => data
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str),
        };
        text.unwrap_or_default().to_string()
    }

    pub fn info(self) -> ProviderInfo {
        ProviderInfo {
            id: self.id(),
            name: self.display_name(),
            models: self.models(),
            default_model: self.default_model(),
            key_placeholder: self.key_placeholder(),
        }
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_request_is_valid_json_without_model_placeholder() {
        for provider in Provider::ALL {
            let request = provider
                .build_request("key", "Write me an email")
                .bind_model(provider.default_model());

            let serialized = serde_json::to_string(&request.body).unwrap();
            let reparsed: Value = serde_json::from_str(&serialized).unwrap();

            if let Some(model) = reparsed.get("model") {
                assert_eq!(
                    model.as_str(),
                    Some(provider.default_model()),
                    "{provider:?} left the model unbound"
                );
            }
            assert!(!serialized.contains("\"model\":null"));
        }
    }

    #[test]
    fn test_parse_response_of_empty_object_is_empty_string() {
        for provider in Provider::ALL {
            assert_eq!(provider.parse_response(&json!({})), "", "{provider:?}");
        }
    }

    #[test]
    fn test_parse_response_reads_each_shape() {
        let chat = json!({ "choices": [{ "message": { "content": "Hi team," } }] });
        assert_eq!(Provider::OpenAi.parse_response(&chat), "Hi team,");
        assert_eq!(Provider::Mistral.parse_response(&chat), "Hi team,");
        assert_eq!(Provider::Groq.parse_response(&chat), "Hi team,");

        let gemini = json!({ "candidates": [{ "content": { "parts": [{ "text": "Hello," }] } }] });
        assert_eq!(Provider::Gemini.parse_response(&gemini), "Hello,");

        let anthropic = json!({ "content": [{ "type": "text", "text": "Dear Jane," }] });
        assert_eq!(Provider::Anthropic.parse_response(&anthropic), "Dear Jane,");
    }

    #[test]
    fn test_parse_response_wrong_shape_degrades() {
        let wrong = json!({ "choices": [] });
        assert_eq!(Provider::OpenAi.parse_response(&wrong), "");
        let not_a_string = json!({ "content": [{ "text": 42 }] });
        assert_eq!(Provider::Anthropic.parse_response(&not_a_string), "");
    }

    #[test]
    fn test_gemini_has_model_in_url_not_body() {
        let request = Provider::Gemini.build_request("k", "p").bind_model("gemini-1.5-pro");
        assert!(request.body.get("model").is_none());
        assert_eq!(
            Provider::Gemini.endpoint("gemini-1.5-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_auth_header_conventions() {
        let header = |p: Provider, name: &str| {
            p.build_request("secret", "p")
                .headers
                .into_iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v)
        };
        assert_eq!(header(Provider::OpenAi, "Authorization").as_deref(), Some("Bearer secret"));
        assert_eq!(header(Provider::Groq, "Authorization").as_deref(), Some("Bearer secret"));
        assert_eq!(header(Provider::Gemini, "x-goog-api-key").as_deref(), Some("secret"));
        assert_eq!(header(Provider::Anthropic, "x-api-key").as_deref(), Some("secret"));
        assert_eq!(
            header(Provider::Anthropic, "anthropic-version").as_deref(),
            Some("2023-06-01")
        );
    }

    #[test]
    fn test_resolve_model_falls_back_to_default() {
        assert_eq!(Provider::OpenAi.resolve_model(Some("gpt-4o")), "gpt-4o");
        assert_eq!(Provider::OpenAi.resolve_model(Some("gpt-2")), "gpt-4o-mini");
        assert_eq!(Provider::Groq.resolve_model(None), "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_default_model_is_listed() {
        for provider in Provider::ALL {
            assert!(provider.models().contains(&provider.default_model()));
        }
    }

    #[test]
    fn test_from_str_round_trips_ids() {
        for provider in Provider::ALL {
            assert_eq!(provider.id().parse::<Provider>(), Ok(provider));
        }
        assert_eq!(
            "cohere".parse::<Provider>(),
            Err(UnknownProvider("cohere".to_string()))
        );
    }
}
