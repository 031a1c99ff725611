//! Filter key/value pairs for list queries.

use std::collections::BTreeMap;

/// Filter values keyed by query parameter name.
///
/// Keys map directly onto the server's filter parameters (`name`,
/// `channel_group_name`, `m3u_account`, ...). Empty values are treated as
/// "no filter" and never sent.
///
/// # Example
///
/// ```
/// use dispatcharr_lib::api::query::Filters;
///
/// let mut filters = Filters::new();
/// filters.set("name", "news");
/// filters.set("m3u_account", "");
///
/// let pairs: Vec<_> = filters.active().collect();
/// assert_eq!(pairs, vec![("name", "news")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    values: BTreeMap<String, String>,
}

impl Filters {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a filter value, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`Filters::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Removes a filter.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Returns the value for a key, including empty values.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterates over filters with a non-empty value, in key order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` if no filter has a non-empty value.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Copies every entry of `other` into this set.
    pub fn extend(&mut self, other: &Filters) {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
    }
}
