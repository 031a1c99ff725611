//! Raw byte storage behind [`SettingsProvider`](super::SettingsProvider).

use async_trait::async_trait;
use dashmap::DashMap;

use super::SettingsError;

#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError>;

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError>;

    /// Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> Result<bool, SettingsError>;

    /// Every stored key, sorted.
    async fn keys(&self) -> Result<Vec<String>, SettingsError>;
}

/// Settings that live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(self.values.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, SettingsError> {
        let mut keys: Vec<String> = self.values.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}
