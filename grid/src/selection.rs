//! Selection rules shared by every way of selecting cells.
//!
//! A single cell toggles. A group of cells (row, column, column group) follows
//! the aggregate rule: if every cell in the group is already selected the
//! whole group is deselected, otherwise the whole group is selected. An empty
//! group counts as fully selected, so toggling it writes nothing.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::Serialize;

use crate::index::{Cell, CellKey, GridIndex};

/// One cell write, reported to the host observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellChange {
    pub key: CellKey,
    pub selected: bool,
}

/// State a group moves to when toggled: deselect only if all are selected.
#[must_use]
pub fn group_target_state<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> bool {
    !cells.into_iter().all(|c| c.selected)
}

/// Write `state` to every existing cell in `keys`.
///
/// Every written cell is reported, including cells already in `state`.
pub fn apply(index: &mut GridIndex, keys: &[CellKey], state: bool) -> Vec<CellChange> {
    keys.iter()
        .filter(|key| index.set_selected(key, state))
        .map(|key| CellChange { key: key.clone(), selected: state })
        .collect()
}

/// Toggle a single cell. Returns `None` if there is no cell at `key`.
pub fn toggle_cell(index: &mut GridIndex, key: &CellKey) -> Option<CellChange> {
    let state = !index.cell(key)?.selected;
    index.set_selected(key, state);
    Some(CellChange { key: key.clone(), selected: state })
}

/// Apply the aggregate rule to a group of cells.
pub fn toggle_group(index: &mut GridIndex, keys: &[CellKey]) -> Vec<CellChange> {
    let state = group_target_state(keys.iter().filter_map(|key| index.cell(key)));
    apply(index, keys, state)
}

/// Visible selected cells in display order: row by row, then column by column.
#[must_use]
pub fn selected_cells(index: &GridIndex) -> Vec<&Cell> {
    index
        .rows()
        .flat_map(|row| {
            index
                .columns()
                .filter_map(move |column| index.cell(&CellKey { row: row.id.clone(), column: column.id.clone() }))
        })
        .filter(|cell| cell.selected && cell.is_visible())
        .collect()
}
