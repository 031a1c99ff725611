//! Ordering types for list queries.

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// Specifies the ordering of list results.
///
/// The API sorts on one field at a time; descending order is requested by
/// prefixing the field name with `-`.
///
/// # Example
///
/// ```
/// use dispatcharr_lib::api::query::Ordering;
///
/// assert_eq!(Ordering::asc("name").to_param(), "name");
/// assert_eq!(Ordering::desc("channel_group__name").to_param(), "-channel_group__name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

impl Ordering {
    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Encodes this ordering as the `ordering` query parameter value.
    pub fn to_param(&self) -> String {
        match self.direction {
            Direction::Asc => self.field.clone(),
            Direction::Desc => format!("-{}", self.field),
        }
    }
}
