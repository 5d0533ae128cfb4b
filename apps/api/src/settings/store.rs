use std::sync::Arc;

use crate::models::settings::Settings;
use crate::storage::{get_typed, set_typed, KeyValueStore, StorageError};

const KEY_API_KEY: &str = "apiKey";
const KEY_PROVIDER: &str = "provider";
const KEY_MODEL: &str = "model";
const KEY_PERSONAL_NOTE: &str = "personalNote";
const KEY_LEGACY_RESUME: &str = "resume";

/// Settings live in the synchronized store, one key per field.
#[derive(Clone)]
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> Result<Settings, StorageError> {
        let kv = self.kv.as_ref();
        Ok(Settings {
            api_key: get_typed(kv, KEY_API_KEY).await?.unwrap_or_default(),
            provider: get_typed(kv, KEY_PROVIDER).await?.unwrap_or_default(),
            model: get_typed(kv, KEY_MODEL).await?.unwrap_or_default(),
            personal_note: get_typed(kv, KEY_PERSONAL_NOTE).await?.unwrap_or_default(),
            resume: get_typed::<String>(kv, KEY_LEGACY_RESUME)
                .await?
                .filter(|r| !r.trim().is_empty()),
        })
    }

    /// Overwrites every user-editable field. The legacy resume is left alone.
    pub async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let kv = self.kv.as_ref();
        set_typed(kv, KEY_API_KEY, &settings.api_key).await?;
        set_typed(kv, KEY_PROVIDER, &settings.provider).await?;
        set_typed(kv, KEY_MODEL, &settings.model).await?;
        set_typed(kv, KEY_PERSONAL_NOTE, &settings.personal_note).await?;
        Ok(())
    }
}
