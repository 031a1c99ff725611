//! Row selection that is independent of the loaded page.
//!
//! Selection is keyed by [`RowId`], so a row stays selected while the user
//! pages or re-sorts. It is reconciled against the *selection superset* (every
//! ID matching the active filters) after each fetch: IDs that fell out of the
//! superset are dropped silently.

use std::collections::HashSet;

use dispatcharr_lib::model::RowId;

/// Tri-state of a "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    /// Some but not all rows are selected.
    Partial,
    Checked,
}

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<RowId>,
}

impl SelectionSet {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// Get the number of selected rows.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Toggle selection of an ID.
    /// Returns `true` if the ID is selected afterwards.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Select every ID of the superset, not only the visible page.
    /// Returns the IDs that were newly selected.
    pub fn select_all(&mut self, superset: &[RowId]) -> Vec<RowId> {
        superset
            .iter()
            .copied()
            .filter(|id| self.selected.insert(*id))
            .collect()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<RowId> {
        let mut removed: Vec<_> = self.selected.drain().collect();
        removed.sort();
        removed
    }

    /// Drop every ID that is not part of `superset`.
    /// Returns the IDs that were dropped.
    pub fn retain_within(&mut self, superset: &[RowId]) -> Vec<RowId> {
        let keep: HashSet<RowId> = superset.iter().copied().collect();
        let mut dropped: Vec<_> = self
            .selected
            .iter()
            .filter(|id| !keep.contains(id))
            .copied()
            .collect();
        for id in &dropped {
            self.selected.remove(id);
        }
        dropped.sort();
        dropped
    }

    /// State of the header checkbox relative to the superset.
    pub fn check_state(&self, superset: &[RowId]) -> CheckState {
        let selected = superset.iter().filter(|id| self.is_selected(**id)).count();
        match selected {
            0 => CheckState::Unchecked,
            n if n == superset.len() => CheckState::Checked,
            _ => CheckState::Partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ids;

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle(RowId(4)));
        assert!(selection.is_selected(RowId(4)));
        assert!(!selection.toggle(RowId(4)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_covers_superset() {
        let mut selection = SelectionSet::new();
        selection.toggle(RowId(2));

        let added = selection.select_all(&ids(&[1, 2, 3, 4]));

        assert_eq!(added, ids(&[1, 3, 4]));
        assert_eq!(selection.selected(), ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_retain_within_drops_missing_ids() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&[1, 2, 3]));

        let dropped = selection.retain_within(&ids(&[3, 1, 9]));

        assert_eq!(dropped, ids(&[2]));
        assert_eq!(selection.selected(), ids(&[1, 3]));
    }

    #[test]
    fn test_clear_reports_removed() {
        let mut selection = SelectionSet::new();
        selection.select_all(&ids(&[5, 3]));
        assert_eq!(selection.clear(), ids(&[3, 5]));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_check_state() {
        let superset = ids(&[1, 2]);
        let mut selection = SelectionSet::new();
        assert_eq!(selection.check_state(&superset), CheckState::Unchecked);
        selection.toggle(RowId(1));
        assert_eq!(selection.check_state(&superset), CheckState::Partial);
        selection.toggle(RowId(2));
        assert_eq!(selection.check_state(&superset), CheckState::Checked);
        assert_eq!(selection.check_state(&[]), CheckState::Unchecked);
    }
}
