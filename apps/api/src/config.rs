use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; a bad value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding `sync.json` and `local.json`.
    pub data_dir: PathBuf,
    /// When set, settings live in Redis instead of `sync.json`.
    pub redis_url: Option<String>,
    /// Sends every provider call to this base URL instead of the vendor's.
    pub llm_base_url: Option<String>,
    /// Treat an unexpected provider response shape as an error instead of "".
    pub strict_response_shape: bool,
    pub page_fetch_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            redis_url: optional_env("REDIS_URL"),
            llm_base_url: optional_env("LLM_BASE_URL"),
            strict_response_shape: parse_env("STRICT_RESPONSE_SHAPE", false)?,
            page_fetch_timeout_secs: parse_env("PAGE_FETCH_TIMEOUT_SECS", 30)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
