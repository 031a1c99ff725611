use std::sync::Arc;

use dispatcharr_grid::query::QueryController;
use dispatcharr_grid::query::QueryState;
use dispatcharr_grid::table::RenderContext;
use dispatcharr_grid::table::render;
use dispatcharr_lib::api::STREAM_FILTER_KEYS;
use dispatcharr_lib::api::STREAM_ORDERING_FIELDS;
use log::info;

use super::Context;
use super::goto_page;
use super::loaded;
use super::parse_filters;
use super::stream_columns;
use crate::cli::FilterArgs;
use crate::cli::PageArgs;
use crate::error::CliError;
use crate::output::format_table;

const TABLE: &str = "streams";

pub async fn streams(
    cx: &Context,
    page: PageArgs,
    filter: FilterArgs,
    sorts: Vec<String>,
    select_all: bool,
) -> Result<(), CliError> {
    let mut state = QueryState::new();
    state.filters = parse_filters(&filter.filters, STREAM_FILTER_KEYS)?;
    for field in &sorts {
        if !STREAM_ORDERING_FIELDS.contains(&field.as_str()) {
            return Err(CliError::InvalidArgument(format!(
                "cannot sort by '{field}', expected one of: {}",
                STREAM_ORDERING_FIELDS.join(", ")
            )));
        }
        state.sort.toggle(field);
    }
    if let Some(size) = cx.page_size(TABLE, page.page_size).await? {
        state.page_size = size;
    }

    let actor = cx.login().await?;
    let client = cx.client().await?;
    let gateway = Arc::new(client.streams());
    let table = QueryController::with_state(gateway.clone(), state);

    loaded(&table, table.fetch().await)?;
    goto_page(&table, page.page).await?;

    if select_all {
        let count = table.select_all();
        info!("Selected {} streams", count);
    }

    let groups = cx.store.channel_groups(gateway.as_ref()).await;
    let columns = stream_columns();
    let model = render(
        &columns,
        &table.snapshot(),
        &RenderContext {
            actor: &actor,
            group_options: &groups,
            dragging: None,
        },
    );
    print!("{}", format_table(&columns, &model, cx.width));

    if select_all {
        println!("{} streams selected", table.selected_ids().len());
    }
    Ok(())
}
