//! Stream rows.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Row;
use super::RowId;

/// An input stream imported from an M3U account or created by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: RowId,
    pub name: String,
    pub url: Option<String>,
    /// Owning M3U account, `None` for custom streams.
    pub m3u_account: Option<i64>,
    pub logo_url: Option<String>,
    pub tvg_id: Option<String>,
    #[serde(default)]
    pub current_viewers: u32,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    pub stream_profile_id: Option<i64>,
    #[serde(default)]
    pub is_custom: bool,
    /// Channel group primary key.
    pub channel_group: Option<i64>,
    pub stream_hash: Option<String>,
}

impl Row for Stream {
    fn id(&self) -> RowId {
        self.id
    }
}
