//! Column definitions.

use std::sync::Arc;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// How a column claims horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSize {
    /// Exactly this many cells.
    Fixed(u16),
    /// A share of the space left after fixed columns, by weight.
    Flex(u16),
}

/// Kind of input rendered in a column's header filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterControl {
    /// Free text.
    Text,
    /// Multi-select over the channel group names.
    Groups,
}

/// Header filter bound to one query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query parameter the value is sent as.
    pub key: String,
    pub placeholder: String,
    pub control: FilterControl,
}

impl FilterSpec {
    /// A free-text filter.
    pub fn text(key: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            placeholder: placeholder.into(),
            control: FilterControl::Text,
        }
    }

    /// A channel group multi-select.
    pub fn groups(key: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            placeholder: placeholder.into(),
            control: FilterControl::Groups,
        }
    }
}

/// A per-row action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    /// Disabled for actors without admin privileges.
    pub requires_admin: bool,
}

impl RowAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            requires_admin: false,
        }
    }

    /// Mark the action as admin-only.
    pub fn admin_only(mut self) -> Self {
        self.requires_admin = true;
        self
    }
}

/// Extracts the display text of a cell from a row.
pub type Accessor<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// What a column displays.
pub enum ColumnKind<R> {
    /// Row checkbox, with a tri-state "select all" in the header.
    Select,
    /// Text taken from the row.
    Text {
        accessor: Accessor<R>,
        /// Ordering field sent when the header is clicked. `None` means the
        /// column is not sortable.
        sort_field: Option<String>,
        filter: Option<FilterSpec>,
    },
    /// Row action buttons.
    Actions(Vec<RowAction>),
    /// Drag handle for reorderable tables.
    DragHandle,
}

impl<R> Clone for ColumnKind<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Select => Self::Select,
            Self::Text {
                accessor,
                sort_field,
                filter,
            } => Self::Text {
                accessor: accessor.clone(),
                sort_field: sort_field.clone(),
                filter: filter.clone(),
            },
            Self::Actions(actions) => Self::Actions(actions.clone()),
            Self::DragHandle => Self::DragHandle,
        }
    }
}

/// One column of a table.
///
/// # Example
///
/// ```ignore
/// let columns = vec![
///     ColumnDef::select(),
///     ColumnDef::text("name", "Name", |s: &Stream| s.name.clone())
///         .sortable("name")
///         .filter(FilterSpec::text("name", "Name"))
///         .size(ColumnSize::Flex(2)),
///     ColumnDef::actions(vec![RowAction::new("delete", "Delete").admin_only()]),
/// ];
/// ```
pub struct ColumnDef<R> {
    pub id: String,
    pub header: String,
    pub size: ColumnSize,
    pub align: Alignment,
    pub kind: ColumnKind<R>,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            size: self.size,
            align: self.align,
            kind: self.kind.clone(),
        }
    }
}

impl<R> ColumnDef<R> {
    /// Selection checkbox column.
    pub fn select() -> Self {
        Self {
            id: "select".to_string(),
            header: String::new(),
            size: ColumnSize::Fixed(3),
            align: Alignment::Center,
            kind: ColumnKind::Select,
        }
    }

    /// Text column reading its value through `accessor`.
    pub fn text<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            size: ColumnSize::Flex(1),
            align: Alignment::Left,
            kind: ColumnKind::Text {
                accessor: Arc::new(accessor),
                sort_field: None,
                filter: None,
            },
        }
    }

    /// Action button column.
    pub fn actions(actions: Vec<RowAction>) -> Self {
        Self {
            id: "actions".to_string(),
            header: "Actions".to_string(),
            size: ColumnSize::Fixed(12),
            align: Alignment::Right,
            kind: ColumnKind::Actions(actions),
        }
    }

    /// Drag handle column.
    pub fn drag_handle() -> Self {
        Self {
            id: "drag".to_string(),
            header: String::new(),
            size: ColumnSize::Fixed(2),
            align: Alignment::Center,
            kind: ColumnKind::DragHandle,
        }
    }

    /// Make a text column sortable on `field`. No effect on other kinds.
    pub fn sortable(mut self, field: impl Into<String>) -> Self {
        if let ColumnKind::Text { sort_field, .. } = &mut self.kind {
            *sort_field = Some(field.into());
        }
        self
    }

    /// Attach a header filter to a text column. No effect on other kinds.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        if let ColumnKind::Text { filter, .. } = &mut self.kind {
            *filter = Some(spec);
        }
        self
    }

    pub fn size(mut self, size: ColumnSize) -> Self {
        self.size = size;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// The ordering field, if the column is sortable.
    pub fn sort_field(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Text { sort_field, .. } => sort_field.as_deref(),
            _ => None,
        }
    }

    /// The header filter, if any.
    pub fn filter_spec(&self) -> Option<&FilterSpec> {
        match &self.kind {
            ColumnKind::Text { filter, .. } => filter.as_ref(),
            _ => None,
        }
    }
}

/// Resolve column widths for a table `total` cells wide.
///
/// Fixed columns get their width first; the remainder is split between flex
/// columns by weight, with any rounding leftover going to the last one.
pub fn resolve_widths<R>(columns: &[ColumnDef<R>], total: u16) -> Vec<u16> {
    let fixed: u16 = columns
        .iter()
        .map(|c| match c.size {
            ColumnSize::Fixed(w) => w,
            ColumnSize::Flex(_) => 0,
        })
        .fold(0u16, u16::saturating_add);
    let weights: u32 = columns
        .iter()
        .map(|c| match c.size {
            ColumnSize::Flex(w) => u32::from(w),
            ColumnSize::Fixed(_) => 0,
        })
        .sum();
    let remaining = u32::from(total.saturating_sub(fixed));

    let mut widths: Vec<u16> = columns
        .iter()
        .map(|c| match c.size {
            ColumnSize::Fixed(w) => w,
            ColumnSize::Flex(w) if weights > 0 => (remaining * u32::from(w) / weights) as u16,
            ColumnSize::Flex(_) => 0,
        })
        .collect();

    let flex_total: u32 = widths
        .iter()
        .zip(columns)
        .filter(|(_, c)| matches!(c.size, ColumnSize::Flex(_)))
        .map(|(w, _)| u32::from(*w))
        .sum();
    if let Some(last) = columns
        .iter()
        .rposition(|c| matches!(c.size, ColumnSize::Flex(w) if w > 0))
    {
        widths[last] += (remaining - flex_total) as u16;
    }
    widths
}
