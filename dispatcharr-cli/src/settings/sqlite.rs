//! SQLite settings storage with a read-through cache.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::SettingsBackend;
use super::SettingsError;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
)";

pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        debug!("Opening settings at {}", path.as_ref().display());
        let client = ClientBuilder::new().path(path).open().await?;
        client.conn(|conn| conn.execute(SCHEMA, [])).await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, SettingsError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let lookup = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM preferences WHERE key = ?1")?;
                let mut rows = stmt.query([&lookup])?;
                rows.next()?.map(|row| row.get::<_, Vec<u8>>(0)).transpose()
            })
            .await?;

        if let Some(value) = &value {
            self.cache.insert(key.to_string(), value.clone());
        }
        Ok(value)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), SettingsError> {
        let row_key = key.to_string();
        let row_value = value.clone();
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    rusqlite::params![row_key, row_value, updated_at],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, SettingsError> {
        let row_key = key.to_string();
        let removed = self
            .client
            .conn(move |conn| conn.execute("DELETE FROM preferences WHERE key = ?1", [&row_key]))
            .await?;

        self.cache.remove(key);
        Ok(removed > 0)
    }

    async fn keys(&self) -> Result<Vec<String>, SettingsError> {
        let keys = self
            .client
            .conn(|conn| {
                let mut stmt = conn.prepare("SELECT key FROM preferences ORDER BY key")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn backend(name: &str) -> (SqliteBackend, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "dispatcharr-cli-{name}-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        (SqliteBackend::open(&path).await.unwrap(), path)
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let (db, path) = backend("reopen").await;
        db.set_bytes("server.url", vec![1, 2, 3]).await.unwrap();
        db.set_bytes("server.url", vec![4]).await.unwrap();
        drop(db);

        let db = SqliteBackend::open(&path).await.unwrap();
        assert_eq!(db.get_bytes("server.url").await.unwrap(), Some(vec![4]));
        assert_eq!(db.get_bytes("missing").await.unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_delete_and_keys() {
        let (db, path) = backend("keys").await;
        db.set_bytes("b", vec![]).await.unwrap();
        db.set_bytes("a", vec![]).await.unwrap();

        assert_eq!(db.keys().await.unwrap(), vec!["a", "b"]);
        assert!(db.delete("a").await.unwrap());
        assert!(!db.delete("a").await.unwrap());
        assert_eq!(db.get_bytes("a").await.unwrap(), None);

        std::fs::remove_file(&path).unwrap();
    }
}
