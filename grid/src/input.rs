//! Input model: pointer targets, mouse buttons, the drag lock, and hover state.
//!
//! A host reports what the pointer is over as a [`Target`]. `DragState` is the
//! gesture tracked between pointer-down on a cell and pointer-up: the mode
//! chosen at pointer-down is applied to every cell the pointer enters until
//! the gesture ends. `UiState` is the hover state the surface reads to decide
//! which labels are drawn as active.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::index::{CellKey, EntityId};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A drawn cell.
    Cell(CellKey),
    /// A row label.
    RowLabel(EntityId),
    /// A column label.
    ColumnLabel(EntityId),
    /// A column group label above its bracket.
    GroupLabel(EntityId),
    /// Anywhere else inside the grid area.
    Background,
}

/// Drag-selection gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down on a cell.
    #[default]
    Idle,
    /// The primary button went down on a cell and is still held.
    Painting {
        /// State written to every cell the pointer enters.
        mode: bool,
    },
}

impl DragState {
    /// The locked selection mode, if a drag is in progress.
    #[must_use]
    pub fn mode(self) -> Option<bool> {
        match self {
            Self::Idle => None,
            Self::Painting { mode } => Some(mode),
        }
    }
}

/// Hover state visible to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Row whose label is drawn active.
    pub active_row: Option<EntityId>,
    /// Column whose label is drawn active.
    pub active_column: Option<EntityId>,
    /// Group whose columns are tinted.
    pub highlighted_group: Option<EntityId>,
    /// Last target reported through coordinate-based pointer events.
    pub hover: Option<Target>,
}

impl UiState {
    /// Drop every active label.
    pub fn clear_labels(&mut self) {
        self.active_row = None;
        self.active_column = None;
    }

    #[must_use]
    pub fn is_row_active(&self, id: &EntityId) -> bool {
        self.active_row.as_ref() == Some(id)
    }

    #[must_use]
    pub fn is_column_active(&self, id: &EntityId) -> bool {
        self.active_column.as_ref() == Some(id)
    }

    #[must_use]
    pub fn is_group_highlighted(&self, id: &EntityId) -> bool {
        self.highlighted_group.as_ref() == Some(id)
    }
}
