//! Row identity shared by every table.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Stable unique identifier of a row (the server's primary key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A record of a paged remote data set.
///
/// Domain fields are opaque to table controllers; only the identifier is
/// used for selection and ordering.
pub trait Row: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Unique identifier for this row.
    fn id(&self) -> RowId;
}
