//! Persistent CLI settings.
//!
//! Values are stored as bincode bytes under dotted keys. [`SettingKey`] is
//! the closed set of keys the CLI understands; each key knows how to parse
//! and display its value so `config set` and `config get` can work on text.

mod backend;
mod sqlite;

pub use backend::MemoryBackend;
pub use backend::SettingsBackend;
pub use sqlite::SqliteBackend;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dispatcharr_lib::api::query::MAX_PAGE_SIZE;
use dispatcharr_lib::model::UserLevel;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(bincode::Error),
    #[error("deserialization error: {0}")]
    Deserialization(bincode::Error),
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// A known setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKey {
    /// Base URL of the Dispatcharr server.
    ServerUrl,
    /// Bearer token sent with every request.
    ServerToken,
    /// Privilege level assumed for local checks.
    ActorLevel,
    /// Remembered page size of one table.
    TablePageSize(String),
}

impl SettingKey {
    const TABLE_PREFIX: &'static str = "table.";
    const PAGE_SIZE_SUFFIX: &'static str = ".page_size";

    pub fn page_size(table: impl Into<String>) -> Self {
        Self::TablePageSize(table.into())
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerUrl => f.write_str("server.url"),
            Self::ServerToken => f.write_str("server.token"),
            Self::ActorLevel => f.write_str("actor.level"),
            Self::TablePageSize(table) => {
                write!(f, "{}{}{}", Self::TABLE_PREFIX, table, Self::PAGE_SIZE_SUFFIX)
            }
        }
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server.url" => Ok(Self::ServerUrl),
            "server.token" => Ok(Self::ServerToken),
            "actor.level" => Ok(Self::ActorLevel),
            _ => s
                .strip_prefix(Self::TABLE_PREFIX)
                .and_then(|rest| rest.strip_suffix(Self::PAGE_SIZE_SUFFIX))
                .filter(|table| !table.is_empty() && !table.contains('.'))
                .map(Self::page_size)
                .ok_or_else(|| SettingsError::UnknownKey(s.to_string())),
        }
    }
}

/// Typed settings over a [`SettingsBackend`].
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &SettingKey) -> Result<Option<T>, SettingsError> {
        match self.backend.get_bytes(&key.to_string()).await? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(SettingsError::Deserialization),
            None => Ok(None),
        }
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &SettingKey, value: &T) -> Result<(), SettingsError> {
        let bytes = bincode::serialize(value).map_err(SettingsError::Serialization)?;
        self.backend.set_bytes(&key.to_string(), bytes).await
    }

    /// Returns `true` if the key was set.
    pub async fn unset(&self, key: &SettingKey) -> Result<bool, SettingsError> {
        self.backend.delete(&key.to_string()).await
    }

    /// Stored keys the CLI still understands.
    pub async fn keys(&self) -> Result<Vec<SettingKey>, SettingsError> {
        Ok(self
            .backend
            .keys()
            .await?
            .iter()
            .filter_map(|k| k.parse().ok())
            .collect())
    }

    /// Parse `raw` according to `key` and store it.
    pub async fn set_text(&self, key: &SettingKey, raw: &str) -> Result<(), SettingsError> {
        let invalid = |message: &str| SettingsError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            SettingKey::ServerUrl => {
                let url = raw.trim().trim_end_matches('/');
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(invalid("expected an http(s) URL"));
                }
                self.set(key, &url.to_string()).await
            }
            SettingKey::ServerToken => self.set(key, &raw.trim().to_string()).await,
            SettingKey::ActorLevel => {
                let level = parse_level(raw).ok_or_else(|| {
                    invalid("expected streamer, standard, admin or a numeric level")
                })?;
                self.set(key, &level).await
            }
            SettingKey::TablePageSize(_) => {
                let size: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected a positive integer"))?;
                if size == 0 || size > MAX_PAGE_SIZE {
                    return Err(invalid("out of range"));
                }
                self.set(key, &size).await
            }
        }
    }

    /// The stored value of `key` as text; secrets are masked.
    pub async fn get_text(&self, key: &SettingKey) -> Result<Option<String>, SettingsError> {
        let text = match key {
            SettingKey::ServerUrl => self.get::<String>(key).await?,
            SettingKey::ServerToken => self
                .get::<String>(key)
                .await?
                .map(|token| mask(&token)),
            SettingKey::ActorLevel => self
                .get::<UserLevel>(key)
                .await?
                .map(|level| format!("{level:?}").to_lowercase()),
            SettingKey::TablePageSize(_) => self.get::<usize>(key).await?.map(|n| n.to_string()),
        };
        Ok(text)
    }
}

fn parse_level(raw: &str) -> Option<UserLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "streamer" => Some(UserLevel::Streamer),
        "standard" => Some(UserLevel::Standard),
        "admin" => Some(UserLevel::Admin),
        other => other.parse::<i32>().ok().map(UserLevel::from),
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}
