//! Drop target detection.

use dispatcharr_lib::model::RowId;

/// Vertical extent of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowRect {
    pub id: RowId,
    pub top: f32,
    pub height: f32,
}

impl RowRect {
    pub fn new(id: RowId, top: f32, height: f32) -> Self {
        Self { id, top, height }
    }

    pub fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// The row whose vertical center is closest to `pointer_y`.
///
/// Only the vertical axis is considered. Ties go to the earlier row.
pub fn closest_center(rects: &[RowRect], pointer_y: f32) -> Option<RowId> {
    rects
        .iter()
        .min_by(|a, b| {
            let da = (a.center() - pointer_y).abs();
            let db = (b.center() - pointer_y).abs();
            da.total_cmp(&db)
        })
        .map(|r| r.id)
}

/// Lay out `ids` as consecutive rows of equal height starting at 0.
pub fn stacked(ids: &[RowId], row_height: f32) -> Vec<RowRect> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| RowRect::new(*id, i as f32 * row_height, row_height))
        .collect()
}
