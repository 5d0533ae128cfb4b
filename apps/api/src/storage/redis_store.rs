use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;

use super::{KeyValueStore, StorageError};

/// Synchronized settings store shared by every device pointing at the same Redis.
///
/// Keys are namespaced as `{prefix}:{key}` and hold JSON strings.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    pub fn new(client: redis::Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(self.namespaced(key)).await?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(StorageError::from)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let encoded = serde_json::to_string(&value)?;
        conn.set::<_, _, ()>(self.namespaced(key), encoded).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(self.namespaced(key)).await?;
        Ok(())
    }
}
