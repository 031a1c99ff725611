use std::sync::Arc;

use dispatcharr_grid::Reorderer;
use dispatcharr_grid::query::QueryController;
use dispatcharr_grid::query::QueryState;
use dispatcharr_grid::reorder::DropOutcome;
use dispatcharr_grid::table::ColumnDef;
use dispatcharr_grid::table::RenderContext;
use dispatcharr_grid::table::render;
use dispatcharr_lib::model::RowId;
use dispatcharr_lib::model::Stream;

use super::Context;
use super::goto_page;
use super::loaded;
use super::stream_columns;
use crate::cli::PageArgs;
use crate::error::CliError;
use crate::output::format_table;

const TABLE: &str = "channel_streams";

pub async fn channel_streams(
    cx: &Context,
    channel: i64,
    page: PageArgs,
    move_rows: Option<Vec<usize>>,
) -> Result<(), CliError> {
    let channel = RowId(channel);
    let mut state = QueryState::new();
    if let Some(size) = cx.page_size(TABLE, page.page_size).await? {
        state.page_size = size;
    }

    let actor = cx.login().await?;
    let client = cx.client().await?;
    let info = client.channel(channel).await?;
    cx.store.select_channel(Some(channel));

    let gateway = Arc::new(client.channel_streams(channel));
    let table = QueryController::with_state(gateway.clone(), state);
    loaded(&table, table.fetch().await)?;
    goto_page(&table, page.page).await?;

    let reorderer = Reorderer::new(table.clone(), channel);
    if let Some([from, to]) = move_rows.as_deref() {
        let rows = table.row_ids();
        let source = position(&rows, *from)?;
        position(&rows, *to)?;

        reorderer.grab(&actor, source)?;
        let delta = *to as isize - *from as isize;
        reorderer.move_by(delta)?;
        match reorderer.drop().await? {
            DropOutcome::Unchanged => println!("Order unchanged"),
            DropOutcome::Saved => println!("Moved stream {source} to position {to}"),
            DropOutcome::Unsaved => eprintln!("Could not save the new order; see the log"),
        }
    }

    let groups = cx.store.channel_groups(gateway.as_ref()).await;
    let mut columns: Vec<ColumnDef<Stream>> = vec![ColumnDef::drag_handle()];
    columns.extend(stream_columns().into_iter().skip(1));
    let model = render(
        &columns,
        &table.snapshot(),
        &RenderContext {
            actor: &actor,
            group_options: &groups,
            dragging: reorderer.dragging(),
        },
    );

    println!("Channel {} ({})", info.name, channel);
    print!("{}", format_table(&columns, &model, cx.width));
    if reorderer.is_unsaved() {
        println!("* order not saved");
    }
    Ok(())
}

/// The row at 1-based `position` on the loaded page.
fn position(rows: &[RowId], position: usize) -> Result<RowId, CliError> {
    position
        .checked_sub(1)
        .and_then(|i| rows.get(i))
        .copied()
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "position {position} is not on this page (1 to {})",
                rows.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_one_based() {
        let rows = vec![RowId(7), RowId(3), RowId(9)];
        assert_eq!(position(&rows, 1).unwrap(), RowId(7));
        assert_eq!(position(&rows, 3).unwrap(), RowId(9));
        assert!(position(&rows, 0).is_err());
        assert!(position(&rows, 4).is_err());
    }
}
