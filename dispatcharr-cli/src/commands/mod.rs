//! Subcommand handlers.

mod channel_streams;
mod config;
mod delete;
mod preview;
mod streams;

pub use channel_streams::channel_streams;
pub use config::config;
pub use delete::delete_selected;
pub use preview::preview;
pub use streams::streams;

use std::time::Duration;

use dispatcharr_grid::AppStore;
use dispatcharr_grid::query::FetchOutcome;
use dispatcharr_grid::query::QueryController;
use dispatcharr_grid::table::Alignment;
use dispatcharr_grid::table::ColumnDef;
use dispatcharr_grid::table::ColumnSize;
use dispatcharr_grid::table::FilterSpec;
use dispatcharr_grid::table::RowAction;
use dispatcharr_lib::DispatcharrClient;
use dispatcharr_lib::api::Gateway;
use dispatcharr_lib::api::query::Filters;
use dispatcharr_lib::api::query::MAX_PAGE_SIZE;
use dispatcharr_lib::auth::StaticTokenProvider;
use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::Stream;
use dispatcharr_lib::model::UserLevel;
use log::debug;

use crate::error::CliError;
use crate::settings::SettingKey;
use crate::settings::SettingsProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything a handler needs besides its own arguments.
pub struct Context {
    pub settings: SettingsProvider,
    pub store: AppStore,
    pub url: Option<String>,
    pub token: Option<String>,
    pub width: u16,
}

impl Context {
    /// Build a client from the command line, falling back to settings.
    pub async fn client(&self) -> Result<DispatcharrClient, CliError> {
        let url = match &self.url {
            Some(url) => url.clone(),
            None => self
                .settings
                .get::<String>(&SettingKey::ServerUrl)
                .await?
                .ok_or(CliError::NotConfigured("server.url"))?,
        };
        let token = match &self.token {
            Some(token) => token.clone(),
            None => self
                .settings
                .get::<String>(&SettingKey::ServerToken)
                .await?
                .ok_or(CliError::NotConfigured("server.token"))?,
        };

        debug!("Using server {}", url);
        Ok(DispatcharrClient::builder()
            .url(url)
            .token_provider(StaticTokenProvider::new(token))
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build())
    }

    /// Log the configured actor into the store and return it.
    pub async fn login(&self) -> Result<Actor, CliError> {
        let level = self
            .settings
            .get::<UserLevel>(&SettingKey::ActorLevel)
            .await?
            .unwrap_or_default();
        let actor = Actor::new("cli", level);
        self.store.login(actor.clone());
        Ok(actor)
    }

    /// Page size from the argument, else the remembered one for `table`.
    /// An explicit size is remembered.
    pub async fn page_size(&self, table: &str, arg: Option<usize>) -> Result<Option<usize>, CliError> {
        let key = SettingKey::page_size(table);
        match arg {
            Some(size) => {
                if size == 0 || size > MAX_PAGE_SIZE {
                    return Err(CliError::InvalidArgument(format!(
                        "page size must be between 1 and {MAX_PAGE_SIZE}"
                    )));
                }
                self.settings.set(&key, &size).await?;
                Ok(Some(size))
            }
            None => Ok(self.settings.get::<usize>(&key).await?),
        }
    }
}

/// Parse `key=value` arguments, rejecting keys outside `allowed`.
pub fn parse_filters(raw: &[String], allowed: &[&str]) -> Result<Filters, CliError> {
    let mut filters = Filters::new();
    for arg in raw {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| CliError::InvalidArgument(format!("filter '{arg}' is not key=value")))?;
        let key = key.trim();
        if !allowed.contains(&key) {
            return Err(CliError::InvalidArgument(format!(
                "unknown filter '{key}', expected one of: {}",
                allowed.join(", ")
            )));
        }
        filters.set(key, value);
    }
    Ok(filters)
}

/// Apply the first fetch result, turning a failure into an error.
pub fn loaded<G: Gateway + 'static>(
    table: &QueryController<G>,
    outcome: FetchOutcome,
) -> Result<(), CliError> {
    match outcome {
        FetchOutcome::Failed => Err(CliError::Fetch(
            table.last_error().unwrap_or_else(|| "unknown error".to_string()),
        )),
        FetchOutcome::Applied | FetchOutcome::Superseded => Ok(()),
    }
}

/// Go to the 1-based `page`, which must exist.
pub async fn goto_page<G: Gateway + 'static>(
    table: &QueryController<G>,
    page: usize,
) -> Result<(), CliError> {
    if page == 1 {
        return Ok(());
    }
    match table.set_page_index(page).await {
        Some(outcome) => loaded(table, outcome),
        None => Err(CliError::InvalidArgument(format!(
            "page {page} is out of range (1 to {})",
            table.page_count().max(1)
        ))),
    }
}

/// Columns shared by the stream tables.
pub fn stream_columns() -> Vec<ColumnDef<Stream>> {
    vec![
        ColumnDef::select(),
        ColumnDef::text("id", "ID", |s: &Stream| s.id.to_string())
            .size(ColumnSize::Fixed(6))
            .align(Alignment::Right),
        ColumnDef::text("name", "Name", |s: &Stream| s.name.clone())
            .sortable("name")
            .filter(FilterSpec::text("name", "Name"))
            .size(ColumnSize::Flex(3)),
        ColumnDef::text("group", "Group", |s: &Stream| {
            s.channel_group.map(|g| g.to_string()).unwrap_or_default()
        })
        .sortable("channel_group__name")
        .filter(FilterSpec::groups("channel_group_name", "Group"))
        .size(ColumnSize::Flex(1)),
        ColumnDef::text("m3u", "M3U", |s: &Stream| {
            s.m3u_account.map(|a| a.to_string()).unwrap_or_else(|| "custom".to_string())
        })
        .filter(FilterSpec::text("m3u_account", "M3U"))
        .size(ColumnSize::Fixed(7)),
        ColumnDef::text("viewers", "Viewers", |s: &Stream| s.current_viewers.to_string())
            .size(ColumnSize::Fixed(7))
            .align(Alignment::Right),
        ColumnDef::actions(vec![
            RowAction::new("preview", "play"),
            RowAction::new("delete", "delete").admin_only(),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filters() {
        let raw = vec!["name=news & sports".to_string(), "m3u_account=2".to_string()];
        let filters = parse_filters(&raw, &["name", "m3u_account"]).unwrap();

        assert_eq!(filters.get("name"), Some("news & sports"));
        assert_eq!(filters.get("m3u_account"), Some("2"));
    }

    #[test]
    fn test_parse_filters_rejects_unknown_keys() {
        let raw = vec!["colour=red".to_string()];
        assert!(matches!(
            parse_filters(&raw, &["name"]),
            Err(CliError::InvalidArgument(_))
        ));
        let raw = vec!["name".to_string()];
        assert!(parse_filters(&raw, &["name"]).is_err());
    }
}
