//! Channel records.

use serde::Deserialize;
use serde::Serialize;

use super::Row;
use super::RowId;

/// A channel published to clients, backed by an ordered list of streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: RowId,
    pub channel_number: Option<f64>,
    pub name: String,
    pub channel_group_id: Option<i64>,
    pub tvg_id: Option<String>,
    pub epg_data_id: Option<i64>,
    /// Assigned streams in failover order.
    #[serde(default)]
    pub streams: Vec<RowId>,
    pub stream_profile_id: Option<i64>,
    pub uuid: Option<String>,
    pub logo_id: Option<i64>,
    #[serde(default)]
    pub user_level: i32,
}

impl Row for Channel {
    fn id(&self) -> RowId {
        self.id
    }
}
