//! Users and privilege levels.

use serde::Deserialize;
use serde::Serialize;

/// Access level of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum UserLevel {
    /// May only watch streams.
    #[default]
    Streamer,
    /// May browse the catalog.
    Standard,
    /// May modify the catalog (reorder, delete, edit).
    Admin,
}

impl UserLevel {
    /// Numeric level as stored by the server.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Streamer => 0,
            Self::Standard => 1,
            Self::Admin => 10,
        }
    }
}

impl From<i32> for UserLevel {
    fn from(level: i32) -> Self {
        match level {
            l if l >= 10 => Self::Admin,
            l if l >= 1 => Self::Standard,
            _ => Self::Streamer,
        }
    }
}

impl From<UserLevel> for i32 {
    fn from(level: UserLevel) -> Self {
        level.as_i32()
    }
}

/// The user initiating an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
    pub user_level: UserLevel,
}

impl Actor {
    /// Creates an actor with the given level.
    pub fn new(username: impl Into<String>, user_level: UserLevel) -> Self {
        Self {
            username: username.into(),
            user_level,
        }
    }

    /// Whether this actor may mutate catalog data (reorder, bulk delete).
    pub fn is_admin(&self) -> bool {
        self.user_level >= UserLevel::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_match_server_values() {
        assert_eq!(UserLevel::from(0), UserLevel::Streamer);
        assert_eq!(UserLevel::from(1), UserLevel::Standard);
        assert_eq!(UserLevel::from(10), UserLevel::Admin);
        assert_eq!(UserLevel::from(5), UserLevel::Standard);
        assert_eq!(i32::from(UserLevel::Admin), 10);
    }

    #[test]
    fn test_only_admins_mutate() {
        assert!(Actor::new("root", UserLevel::Admin).is_admin());
        assert!(!Actor::new("viewer", UserLevel::Standard).is_admin());
    }
}
