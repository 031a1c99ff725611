use std::sync::Arc;

use dispatcharr_grid::query::QueryController;
use dispatcharr_grid::query::QueryState;
use dispatcharr_lib::api::STREAM_FILTER_KEYS;

use super::Context;
use super::loaded;
use super::parse_filters;
use crate::cli::FilterArgs;
use crate::error::CliError;

/// Select every stream matching the filters and delete them with `yes`.
pub async fn delete_selected(cx: &Context, filter: FilterArgs, yes: bool) -> Result<(), CliError> {
    let mut state = QueryState::new();
    state.filters = parse_filters(&filter.filters, STREAM_FILTER_KEYS)?;

    let actor = cx.login().await?;
    let client = cx.client().await?;
    let table = QueryController::with_state(Arc::new(client.streams()), state);
    loaded(&table, table.fetch().await)?;

    let count = table.select_all();
    if !yes {
        println!("{count} streams match; pass --yes to delete them");
        return Ok(());
    }

    let deleted = table.delete_selected(&actor).await?;
    println!("Deleted {deleted} streams, {} remain", table.total_count());
    Ok(())
}
