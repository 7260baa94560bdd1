//! Row selection tracking.
//!
//! Selection is keyed by row identity rather than position, so it survives
//! page changes, re-sorting and re-filtering.

use std::collections::HashSet;

use crate::model::RowId;

/// Tri-state of a "select all" header checkbox for the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    /// No visible row is selected.
    None,
    /// Some, but not all, visible rows are selected.
    Some,
    /// Every visible row is selected.
    All,
}

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: HashSet<RowId>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection seeded with the given IDs.
    pub fn with_ids(ids: impl IntoIterator<Item = RowId>) -> Self {
        Self {
            selected: ids.into_iter().collect(),
        }
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<RowId> {
        let mut ids: Vec<_> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<RowId> {
        self.selected.drain().collect()
    }

    /// Toggle selection of an ID.
    /// Returns (added, removed) IDs.
    pub fn toggle(&mut self, id: &str) -> (Vec<RowId>, Vec<RowId>) {
        if self.selected.remove(id) {
            (vec![], vec![id.to_string()])
        } else {
            self.selected.insert(id.to_string());
            (vec![id.to_string()], vec![])
        }
    }

    /// Select all items from the provided list of IDs.
    /// Returns the IDs that were newly selected.
    pub fn select_all(&mut self, ids: &[RowId]) -> Vec<RowId> {
        let mut added = Vec::new();
        for id in ids {
            if self.selected.insert(id.clone()) {
                added.push(id.clone());
            }
        }
        added
    }

    /// Deselect every ID in the provided list.
    /// Returns the IDs that were removed.
    pub fn deselect_all(&mut self, ids: &[RowId]) -> Vec<RowId> {
        ids.iter()
            .filter(|id| self.selected.remove(id.as_str()))
            .cloned()
            .collect()
    }

    /// Drop every selected ID that is not in `present`.
    /// Returns the IDs that were removed.
    pub fn retain_present(&mut self, present: &HashSet<RowId>) -> Vec<RowId> {
        let removed: Vec<_> = self
            .selected
            .iter()
            .filter(|id| !present.contains(*id))
            .cloned()
            .collect();
        for id in &removed {
            self.selected.remove(id);
        }
        removed
    }

    /// Header checkbox state for the given visible IDs.
    pub fn state_for(&self, visible: &[RowId]) -> SelectAllState {
        let selected = visible.iter().filter(|id| self.is_selected(id)).count();
        match selected {
            0 => SelectAllState::None,
            n if n == visible.len() => SelectAllState::All,
            _ => SelectAllState::Some,
        }
    }
}
