//! Mapping table state to a render model.
//!
//! [`render`] is a pure function of the column definitions and a
//! [`TableSnapshot`]. It never sorts, filters or pages rows itself: the
//! rows are shown exactly as the server returned them.

use dispatcharr_lib::model::Actor;
use dispatcharr_lib::model::Row;
use dispatcharr_lib::model::RowId;

use super::TableSnapshot;
use super::column::Alignment;
use super::column::ColumnDef;
use super::column::ColumnKind;
use super::column::ColumnSize;
use super::column::FilterControl;
use crate::query::SortDirection;
use crate::selection::CheckState;

/// Inputs to rendering that are not part of the table state.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub actor: &'a Actor,
    /// Options for group filter controls.
    pub group_options: &'a [String],
    /// Row currently being dragged, if any.
    pub dragging: Option<RowId>,
}

/// A filter input in a header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInput {
    pub key: String,
    /// Value as typed, which may not be committed yet.
    pub value: String,
    pub placeholder: String,
    /// Choices for a multi-select; `None` for free text.
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderContent {
    SelectAll(CheckState),
    Label {
        text: String,
        sortable: bool,
        sort: SortDirection,
        filter: Option<FilterInput>,
    },
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: String,
    pub size: ColumnSize,
    pub align: Alignment,
    pub content: HeaderContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Checkbox(bool),
    Text(String),
    Actions(Vec<ActionItem>),
    Grip { enabled: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub id: RowId,
    pub selected: bool,
    pub dragging: bool,
    pub cells: Vec<CellContent>,
}

/// Pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub range_text: String,
    /// 1-based.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub loading: bool,
}

/// Everything needed to draw one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<BodyRow>,
    pub pager: Pager,
}

/// Build the render model for `snapshot`.
pub fn render<R: Row>(
    columns: &[ColumnDef<R>],
    snapshot: &TableSnapshot<R>,
    cx: &RenderContext<'_>,
) -> RenderModel {
    let headers = columns
        .iter()
        .map(|column| HeaderCell {
            column: column.id.clone(),
            size: column.size,
            align: column.align,
            content: header_content(column, snapshot, cx),
        })
        .collect();

    let rows = snapshot
        .rows
        .iter()
        .map(|row| {
            let id = row.id();
            BodyRow {
                id,
                selected: snapshot.selection.is_selected(id),
                dragging: cx.dragging == Some(id),
                cells: columns
                    .iter()
                    .map(|column| body_cell(column, row, snapshot, cx))
                    .collect(),
            }
        })
        .collect();

    let page = snapshot.state.page_index + 1;
    let pager = Pager {
        range_text: snapshot.range_text.clone(),
        page,
        page_count: snapshot.page_count,
        page_size: snapshot.state.page_size,
        total_count: snapshot.total_count,
        has_previous: page > 1,
        has_next: page < snapshot.page_count,
        loading: snapshot.loading,
    };

    RenderModel {
        headers,
        rows,
        pager,
    }
}

fn header_content<R>(
    column: &ColumnDef<R>,
    snapshot: &TableSnapshot<R>,
    cx: &RenderContext<'_>,
) -> HeaderContent {
    match &column.kind {
        ColumnKind::Select => HeaderContent::SelectAll(snapshot.check_state),
        ColumnKind::Text {
            sort_field, filter, ..
        } => HeaderContent::Label {
            text: column.header.clone(),
            sortable: sort_field.is_some(),
            sort: sort_field
                .as_deref()
                .map(|f| snapshot.state.sort.direction_of(f))
                .unwrap_or_default(),
            filter: filter.as_ref().map(|spec| FilterInput {
                key: spec.key.clone(),
                value: snapshot.staged.get(&spec.key).unwrap_or_default().to_string(),
                placeholder: spec.placeholder.clone(),
                options: match spec.control {
                    FilterControl::Text => None,
                    FilterControl::Groups => Some(cx.group_options.to_vec()),
                },
            }),
        },
        ColumnKind::Actions(_) => HeaderContent::Label {
            text: column.header.clone(),
            sortable: false,
            sort: SortDirection::None,
            filter: None,
        },
        ColumnKind::DragHandle => HeaderContent::Blank,
    }
}

fn body_cell<R: Row>(
    column: &ColumnDef<R>,
    row: &R,
    snapshot: &TableSnapshot<R>,
    cx: &RenderContext<'_>,
) -> CellContent {
    match &column.kind {
        ColumnKind::Select => CellContent::Checkbox(snapshot.selection.is_selected(row.id())),
        ColumnKind::Text { accessor, .. } => CellContent::Text(accessor(row)),
        ColumnKind::Actions(actions) => CellContent::Actions(
            actions
                .iter()
                .map(|action| ActionItem {
                    id: action.id.clone(),
                    label: action.label.clone(),
                    enabled: !action.requires_admin || cx.actor.is_admin(),
                })
                .collect(),
        ),
        ColumnKind::DragHandle => CellContent::Grip {
            enabled: cx.actor.is_admin(),
        },
    }
}

#[cfg(test)]
mod tests {
    use dispatcharr_lib::api::query::Filters;
    use dispatcharr_lib::model::UserLevel;

    use super::*;
    use crate::query::QueryState;
    use crate::query::SortState;
    use crate::selection::SelectionSet;
    use crate::table::FilterSpec;
    use crate::table::RowAction;
    use crate::testing::Item;
    use crate::testing::item;

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::drag_handle(),
            ColumnDef::select(),
            ColumnDef::text("name", "Name", |i: &Item| i.name.clone())
                .sortable("name")
                .filter(FilterSpec::text("name", "Name")),
            ColumnDef::text("group", "Group", |_: &Item| "News".to_string())
                .filter(FilterSpec::groups("channel_group_name", "Group")),
            ColumnDef::actions(vec![
                RowAction::new("preview", "Preview"),
                RowAction::new("delete", "Delete").admin_only(),
            ]),
        ]
    }

    fn snapshot() -> TableSnapshot<Item> {
        let mut selection = SelectionSet::new();
        selection.toggle(RowId(2));
        TableSnapshot {
            state: QueryState {
                page_index: 1,
                page_size: 2,
                sort: SortState::new("name", SortDirection::Desc),
                filters: Filters::new(),
            },
            staged: Filters::new().with("name", "zu"),
            rows: vec![item(2, "zulu"), item(1, "alpha")],
            selection,
            check_state: CheckState::Partial,
            total_count: 5,
            page_count: 3,
            range_text: "3 to 4 of 5".to_string(),
            loading: false,
        }
    }

    #[test]
    fn test_rows_keep_server_order() {
        let actor = Actor::new("admin", UserLevel::Admin);
        let groups = vec!["News".to_string()];
        let cx = RenderContext {
            actor: &actor,
            group_options: &groups,
            dragging: Some(RowId(1)),
        };

        let model = render(&columns(), &snapshot(), &cx);

        let ids: Vec<_> = model.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RowId(2), RowId(1)]);
        assert!(model.rows[0].selected);
        assert!(model.rows[1].dragging);
        assert_eq!(model.rows[0].cells[1], CellContent::Checkbox(true));
        assert_eq!(model.rows[0].cells[2], CellContent::Text("zulu".to_string()));
    }

    #[test]
    fn test_headers_show_sort_and_staged_filter() {
        let actor = Actor::new("admin", UserLevel::Admin);
        let groups = vec!["News".to_string(), "Sports".to_string()];
        let cx = RenderContext {
            actor: &actor,
            group_options: &groups,
            dragging: None,
        };

        let model = render(&columns(), &snapshot(), &cx);

        assert_eq!(model.headers[0].content, HeaderContent::Blank);
        assert_eq!(
            model.headers[1].content,
            HeaderContent::SelectAll(CheckState::Partial)
        );
        match &model.headers[2].content {
            HeaderContent::Label {
                sortable,
                sort,
                filter,
                ..
            } => {
                assert!(sortable);
                assert_eq!(*sort, SortDirection::Desc);
                assert_eq!(filter.as_ref().unwrap().value, "zu");
                assert_eq!(filter.as_ref().unwrap().options, None);
            }
            other => panic!("unexpected header {other:?}"),
        }
        match &model.headers[3].content {
            HeaderContent::Label {
                sortable, filter, ..
            } => {
                assert!(!sortable);
                assert_eq!(filter.as_ref().unwrap().options, Some(groups.clone()));
            }
            other => panic!("unexpected header {other:?}"),
        }
    }

    #[test]
    fn test_non_admin_controls_disabled() {
        let actor = Actor::new("viewer", UserLevel::Standard);
        let cx = RenderContext {
            actor: &actor,
            group_options: &[],
            dragging: None,
        };

        let model = render(&columns(), &snapshot(), &cx);
        let cells = &model.rows[0].cells;

        assert_eq!(cells[0], CellContent::Grip { enabled: false });
        match &cells[4] {
            CellContent::Actions(actions) => {
                assert!(actions[0].enabled);
                assert!(!actions[1].enabled);
            }
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_pager() {
        let actor = Actor::new("admin", UserLevel::Admin);
        let cx = RenderContext {
            actor: &actor,
            group_options: &[],
            dragging: None,
        };

        let pager = render(&columns(), &snapshot(), &cx).pager;

        assert_eq!(pager.page, 2);
        assert_eq!(pager.range_text, "3 to 4 of 5");
        assert!(pager.has_previous);
        assert!(pager.has_next);
    }
}
