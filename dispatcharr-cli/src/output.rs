//! Plain-text rendering of table models.

use dispatcharr_grid::query::SortDirection;
use dispatcharr_grid::selection::CheckState;
use dispatcharr_grid::table::Alignment;
use dispatcharr_grid::table::CellContent;
use dispatcharr_grid::table::ColumnDef;
use dispatcharr_grid::table::HeaderContent;
use dispatcharr_grid::table::RenderModel;
use dispatcharr_grid::table::resolve_widths;

const GAP: &str = " ";

/// Format `model` as fixed-width text `width` columns wide.
pub fn format_table<R>(columns: &[ColumnDef<R>], model: &RenderModel, width: u16) -> String {
    let gaps = columns.len().saturating_sub(1) as u16;
    let widths = resolve_widths(columns, width.saturating_sub(gaps));
    let mut out = String::new();

    let header: Vec<String> = model
        .headers
        .iter()
        .map(|h| header_text(&h.content))
        .collect();
    push_line(&mut out, &header, &widths, &alignments(model));
    out.push_str(&"-".repeat(usize::from(width)));
    out.push('\n');

    for row in &model.rows {
        let cells: Vec<String> = row.cells.iter().map(cell_text).collect();
        push_line(&mut out, &cells, &widths, &alignments(model));
    }

    let filters: Vec<String> = model
        .headers
        .iter()
        .filter_map(|h| match &h.content {
            HeaderContent::Label {
                filter: Some(f), ..
            } if !f.value.is_empty() => Some(format!("{}={}", f.key, f.value)),
            _ => None,
        })
        .collect();
    if !filters.is_empty() {
        out.push_str(&format!("filters: {}\n", filters.join(", ")));
    }

    let pager = &model.pager;
    out.push_str(&format!(
        "{}  (page {} of {}, {} per page)\n",
        pager.range_text,
        pager.page,
        pager.page_count.max(1),
        pager.page_size
    ));
    out
}

fn alignments(model: &RenderModel) -> Vec<Alignment> {
    model.headers.iter().map(|h| h.align).collect()
}

fn header_text(content: &HeaderContent) -> String {
    match content {
        HeaderContent::SelectAll(state) => match state {
            CheckState::Unchecked => "[ ]",
            CheckState::Partial => "[-]",
            CheckState::Checked => "[x]",
        }
        .to_string(),
        HeaderContent::Label { text, sort, .. } => match sort {
            SortDirection::Asc => format!("{text} ^"),
            SortDirection::Desc => format!("{text} v"),
            SortDirection::None => text.clone(),
        },
        HeaderContent::Blank => String::new(),
    }
}

fn cell_text(content: &CellContent) -> String {
    match content {
        CellContent::Checkbox(true) => "[x]".to_string(),
        CellContent::Checkbox(false) => "[ ]".to_string(),
        CellContent::Text(text) => text.clone(),
        CellContent::Actions(actions) => actions
            .iter()
            .map(|a| {
                if a.enabled {
                    a.label.clone()
                } else {
                    format!("({})", a.label)
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        CellContent::Grip { enabled: true } => "::".to_string(),
        CellContent::Grip { enabled: false } => "  ".to_string(),
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[u16], aligns: &[Alignment]) {
    let parts: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((text, width), align)| fit(text, usize::from(*width), *align))
        .collect();
    out.push_str(parts.join(GAP).trim_end());
    out.push('\n');
}

fn fit(text: &str, width: usize, align: Alignment) -> String {
    let text: String = if text.chars().count() > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        if width > 0 {
            cut.push('~');
        }
        cut
    } else {
        text.to_string()
    };
    match align {
        Alignment::Left => format!("{text:<width$}"),
        Alignment::Center => format!("{text:^width$}"),
        Alignment::Right => format!("{text:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("news", 6, Alignment::Left), "news  ");
        assert_eq!(fit("news", 6, Alignment::Right), "  news");
        assert_eq!(fit("breaking news", 6, Alignment::Left), "break~");
        assert_eq!(fit("x", 0, Alignment::Left), "");
    }

    #[test]
    fn test_header_text() {
        let label = |sort| HeaderContent::Label {
            text: "Name".to_string(),
            sortable: true,
            sort,
            filter: None,
        };
        assert_eq!(header_text(&label(SortDirection::Asc)), "Name ^");
        assert_eq!(header_text(&label(SortDirection::Desc)), "Name v");
        assert_eq!(header_text(&label(SortDirection::None)), "Name");
        assert_eq!(header_text(&HeaderContent::SelectAll(CheckState::Partial)), "[-]");
    }
}
