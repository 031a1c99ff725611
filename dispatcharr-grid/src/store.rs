//! Application state shared by every table.
//!
//! An explicit container handed to whoever needs it. State is written only
//! through the named actions below and is reset only by [`AppStore::logout`].

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use dispatcharr_lib::api::Gateway;
use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::RowId;
use log::debug;
use log::error;
use log::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StoreState {
    actor: Option<Actor>,
    selected_channel: Option<RowId>,
    /// Loaded on first read.
    channel_groups: Option<Vec<String>>,
}

/// Shared application store.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    inner: Arc<RwLock<StoreState>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }

    pub fn actor(&self) -> Option<Actor> {
        self.read().actor.clone()
    }

    pub fn selected_channel(&self) -> Option<RowId> {
        self.read().selected_channel
    }

    /// Channel group names, fetching them through `gateway` on first read.
    ///
    /// A failed lookup is logged and yields no options; the next read tries
    /// again.
    pub async fn channel_groups<G: Gateway>(&self, gateway: &G) -> Vec<String> {
        let cached = self.read().channel_groups.clone();
        if let Some(groups) = cached {
            return groups;
        }

        match gateway.groups_lookup().await {
            Ok(groups) => {
                debug!("Loaded {} channel groups", groups.len());
                self.write()
                    .channel_groups
                    .get_or_insert_with(|| groups.clone())
                    .clone()
            }
            Err(e) => {
                error!("Failed to load channel groups: {}", e);
                Vec::new()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    pub fn login(&self, actor: Actor) {
        info!("Logged in as {}", actor.username);
        self.write().actor = Some(actor);
    }

    /// Forget everything.
    pub fn logout(&self) {
        *self.write() = StoreState::default();
        info!("Logged out");
    }

    pub fn select_channel(&self, channel: Option<RowId>) {
        self.write().selected_channel = channel;
    }

    /// Replace the cached channel groups, e.g. after a group was created.
    pub fn set_channel_groups(&self, groups: Vec<String>) {
        self.write().channel_groups = Some(groups);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use dispatcharr_lib::model::UserLevel;

    use super::*;
    use crate::testing::Call;
    use crate::testing::FakeGateway;

    fn group_lookups(gateway: &FakeGateway) -> usize {
        gateway.calls().iter().filter(|c| **c == Call::Groups).count()
    }

    #[tokio::test]
    async fn test_groups_loaded_once() {
        let gateway = FakeGateway::new(vec![]);
        let store = AppStore::new();

        assert_eq!(store.channel_groups(&gateway).await, vec!["News", "Sports"]);
        assert_eq!(store.channel_groups(&gateway).await, vec!["News", "Sports"]);
        assert_eq!(group_lookups(&gateway), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let gateway = FakeGateway::new(vec![]);
        gateway.fail_reads.store(true, Ordering::SeqCst);
        let store = AppStore::new();

        assert!(store.channel_groups(&gateway).await.is_empty());

        gateway.fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(store.channel_groups(&gateway).await.len(), 2);
        assert_eq!(group_lookups(&gateway), 2);
    }

    #[tokio::test]
    async fn test_logout_resets_state() {
        let gateway = FakeGateway::new(vec![]);
        let store = AppStore::new();
        let view = store.clone();

        store.login(Actor::new("admin", UserLevel::Admin));
        store.select_channel(Some(RowId(4)));
        store.set_channel_groups(vec!["Kids".to_string()]);
        assert_eq!(view.selected_channel(), Some(RowId(4)));
        assert_eq!(view.channel_groups(&gateway).await, vec!["Kids"]);

        store.logout();

        assert_eq!(view.actor(), None);
        assert_eq!(view.selected_channel(), None);
        view.channel_groups(&gateway).await;
        assert_eq!(group_lookups(&gateway), 1);
    }
}
