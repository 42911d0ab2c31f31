use tracing::debug;

use crate::error::GridError;
use crate::hit;
use crate::index::{Cell, CellKey, EntityId, GridData, GridIndex};
use crate::input::{Button, DragState, Target, UiState};
use crate::layout::{Layout, Point};
use crate::selection::{self, CellChange};
use crate::settings::{Settings, SortSpec};
use crate::surface::{Observer, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A grid finished loading.
    GridLoaded,
    /// The loaded grid has no datasets; show the empty message.
    EmptyGrid,
    /// Layout or order changed; redraw everything.
    RenderNeeded,
    /// Selection or hover changed; restyle cells and labels.
    RestyleNeeded,
    /// A cell was written.
    CellStateChanged(CellChange),
    /// A selection operation or drag finished.
    SelectionChanged,
}

/// Core engine state: all logic that does not depend on a drawing surface.
///
/// Separated from `Engine` so it can be tested without a browser.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub settings: Settings,
    pub index: GridIndex,
    pub ui: UiState,
    pub drag: DragState,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl EngineCore {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings, ..Self::default() }
    }

    // --- Data inputs ---

    /// Index a new grid and replace the current one.
    ///
    /// Rows and columns are put in the configured order and any hover or drag
    /// state is dropped. On error the previous grid stays loaded.
    ///
    /// # Errors
    ///
    /// Propagates [`GridIndex::build`] errors.
    pub fn load(&mut self, data: GridData) -> Result<Vec<Action>, GridError> {
        let mut index = GridIndex::build(data, &self.settings)?;
        index.sort_rows(self.settings.row_sort);
        index.sort_columns(self.settings.column_sort);

        self.index = index;
        self.ui = UiState::default();
        self.drag = DragState::Idle;

        if self.index.is_empty() {
            debug!("grid loaded without datasets");
            return Ok(vec![Action::EmptyGrid, Action::GridLoaded]);
        }
        debug!(
            rows = self.index.row_count(),
            columns = self.index.column_count(),
            cells = self.index.len(),
            "grid loaded"
        );
        Ok(vec![Action::RenderNeeded, Action::GridLoaded])
    }

    /// Parse host JSON arrays and load them. A blank `groups` string means no groups.
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidJson`] for malformed input, otherwise as [`Self::load`].
    pub fn load_json(&mut self, datasets: &str, rows: &str, columns: &str, groups: &str) -> Result<Vec<Action>, GridError> {
        let data = GridData {
            datasets: serde_json::from_str(datasets)?,
            rows: serde_json::from_str(rows)?,
            columns: serde_json::from_str(columns)?,
            groups: if groups.trim().is_empty() { Vec::new() } else { serde_json::from_str(groups)? },
        };
        self.load(data)
    }

    /// Update the container size the layout fills.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport_width = width;
        self.viewport_height = height;
        self.render_if_loaded()
    }

    /// Re-sort rows and columns.
    pub fn reorder(&mut self, rows: SortSpec, columns: SortSpec) -> Vec<Action> {
        self.settings.row_sort = rows;
        self.settings.column_sort = columns;
        self.index.sort_rows(rows);
        self.index.sort_columns(columns);
        self.render_if_loaded()
    }

    // --- Selection ---

    /// Toggle one cell.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownCell`] if no dataset exists at `key`.
    pub fn select_cell(&mut self, key: &CellKey) -> Result<Vec<Action>, GridError> {
        let change = selection::toggle_cell(&mut self.index, key)
            .ok_or_else(|| GridError::UnknownCell { row: key.row.clone(), column: key.column.clone() })?;
        Ok(finish(vec![change]))
    }

    /// Toggle every dataset keyed under a row.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownRow`] if the id is neither a row nor used by any dataset.
    pub fn select_row(&mut self, row: &EntityId) -> Result<Vec<Action>, GridError> {
        if self.index.row(row).is_none() && !self.index.has_row_cells(row) {
            return Err(GridError::UnknownRow(row.clone()));
        }
        let keys = self.index.row_keys(row);
        debug!(%row, cells = keys.len(), "select row");
        Ok(finish(selection::toggle_group(&mut self.index, &keys)))
    }

    /// Toggle every cell of a column across the displayed rows.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownColumn`] if the id is not a column.
    pub fn select_column(&mut self, column: &EntityId) -> Result<Vec<Action>, GridError> {
        if self.index.column(column).is_none() {
            return Err(GridError::UnknownColumn(column.clone()));
        }
        let keys = self.index.column_keys(column);
        debug!(%column, cells = keys.len(), "select column");
        Ok(finish(selection::toggle_group(&mut self.index, &keys)))
    }

    /// Toggle every cell of every column in a group.
    ///
    /// A grid whose columns carry no groups ignores the request.
    ///
    /// # Errors
    ///
    /// [`GridError::UnknownGroup`] if the grid has groups but none with this id.
    pub fn select_column_group(&mut self, group: &EntityId) -> Result<Vec<Action>, GridError> {
        if !self.index.has_groups() {
            return Ok(Vec::new());
        }
        if !self.index.is_group(group) {
            return Err(GridError::UnknownGroup(group.clone()));
        }
        let keys = self.index.group_keys(group);
        debug!(%group, cells = keys.len(), "select column group");
        Ok(finish(selection::toggle_group(&mut self.index, &keys)))
    }

    /// Deselect every cell. Only cells that were selected are reported.
    pub fn reset_selection(&mut self) -> Vec<Action> {
        let keys = self.index.selected_keys();
        finish(selection::apply(&mut self.index, &keys, false))
    }

    /// Select every cell, including those not drawn.
    pub fn select_all(&mut self) -> Vec<Action> {
        let keys = self.index.all_keys();
        finish(selection::apply(&mut self.index, &keys, true))
    }

    // --- Pointer events ---

    /// Primary button down on a cell: lock the drag mode to the opposite of
    /// the cell's state and apply it to that cell.
    pub fn on_pointer_down(&mut self, target: &Target, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Target::Cell(key) = target else {
            return Vec::new();
        };
        let Some(cell) = self.visible_cell(key) else {
            return Vec::new();
        };
        let mode = !cell.selected;
        self.drag = DragState::Painting { mode };

        let mut actions = changes(selection::apply(&mut self.index, std::slice::from_ref(key), mode));
        actions.push(Action::RestyleNeeded);
        actions
    }

    /// Pointer entered a target. Updates hover state and, while dragging,
    /// paints entered cells with the locked mode.
    pub fn on_pointer_enter(&mut self, target: &Target) -> Vec<Action> {
        match target {
            Target::Cell(key) => {
                if self.visible_cell(key).is_none() {
                    return Vec::new();
                }
                self.ui.active_row = Some(key.row.clone());
                self.ui.active_column = Some(key.column.clone());

                let mut actions = match self.drag.mode() {
                    Some(mode) => changes(selection::apply(&mut self.index, std::slice::from_ref(key), mode)),
                    None => Vec::new(),
                };
                actions.push(Action::RestyleNeeded);
                actions
            }
            Target::RowLabel(row) => {
                self.ui.active_row = Some(row.clone());
                vec![Action::RestyleNeeded]
            }
            Target::ColumnLabel(column) => {
                self.ui.active_column = Some(column.clone());
                vec![Action::RestyleNeeded]
            }
            Target::GroupLabel(group) => {
                self.ui.highlighted_group = Some(group.clone());
                vec![Action::RestyleNeeded]
            }
            Target::Background => Vec::new(),
        }
    }

    /// Pointer left a target: labels go inactive, group tint fades.
    pub fn on_pointer_leave(&mut self, target: &Target) -> Vec<Action> {
        match target {
            Target::Cell(_) | Target::RowLabel(_) | Target::ColumnLabel(_) => {
                self.ui.clear_labels();
                vec![Action::RestyleNeeded]
            }
            Target::GroupLabel(_) => {
                self.ui.highlighted_group = None;
                vec![Action::RestyleNeeded]
            }
            Target::Background => Vec::new(),
        }
    }

    /// Button released anywhere in the grid area.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    /// Pointer left the grid area.
    pub fn on_grid_leave(&mut self) -> Vec<Action> {
        let mut actions = match self.ui.hover.take() {
            Some(previous) => self.on_pointer_leave(&previous),
            None => Vec::new(),
        };
        actions.extend(self.end_drag());
        actions
    }

    /// Click on a label selects that row, column, or group.
    ///
    /// # Errors
    ///
    /// As the corresponding `select_*` operation.
    pub fn on_click(&mut self, target: &Target) -> Result<Vec<Action>, GridError> {
        match target {
            Target::RowLabel(row) => self.select_row(row),
            Target::ColumnLabel(column) => self.select_column(column),
            Target::GroupLabel(group) => self.select_column_group(group),
            Target::Cell(_) | Target::Background => Ok(Vec::new()),
        }
    }

    // --- Coordinate-based pointer events ---

    /// Hit-test an SVG-space point against the current layout.
    #[must_use]
    pub fn target_at(&self, svg_pt: Point) -> Option<Target> {
        if self.index.is_empty() {
            return None;
        }
        hit::hit_test(svg_pt, &self.index, &self.layout(), self.settings.display_brackets)
    }

    /// Pointer moved to an SVG-space point: emits leave/enter when the target changes.
    pub fn on_pointer_move(&mut self, svg_pt: Point) -> Vec<Action> {
        let next = self.target_at(svg_pt);
        if next == self.ui.hover {
            return Vec::new();
        }
        let mut actions = match self.ui.hover.take() {
            Some(previous) => self.on_pointer_leave(&previous),
            None => Vec::new(),
        };
        if let Some(target) = &next {
            actions.extend(self.on_pointer_enter(target));
        }
        self.ui.hover = next;
        actions
    }

    /// Button pressed at an SVG-space point.
    pub fn on_pointer_down_at(&mut self, svg_pt: Point, button: Button) -> Vec<Action> {
        match self.target_at(svg_pt) {
            Some(target) => self.on_pointer_down(&target, button),
            None => Vec::new(),
        }
    }

    /// Click at an SVG-space point.
    ///
    /// # Errors
    ///
    /// As [`Self::on_click`].
    pub fn on_click_at(&mut self, svg_pt: Point) -> Result<Vec<Action>, GridError> {
        match self.target_at(svg_pt) {
            Some(target) => self.on_click(&target),
            None => Ok(Vec::new()),
        }
    }

    // --- Queries ---

    /// Drawn cells that are selected, in display order.
    #[must_use]
    pub fn selected_cells(&self) -> Vec<&Cell> {
        selection::selected_cells(&self.index)
    }

    /// Layout for the current grid and viewport.
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::compute(&self.index, self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    fn visible_cell(&self, key: &CellKey) -> Option<&Cell> {
        self.index.cell(key).filter(|cell| cell.is_visible())
    }

    fn end_drag(&mut self) -> Vec<Action> {
        if self.drag == DragState::Idle {
            return Vec::new();
        }
        self.drag = DragState::Idle;
        vec![Action::SelectionChanged]
    }

    fn render_if_loaded(&self) -> Vec<Action> {
        if self.index.is_empty() { Vec::new() } else { vec![Action::RenderNeeded] }
    }
}

fn changes(changes: Vec<CellChange>) -> Vec<Action> {
    changes.into_iter().map(Action::CellStateChanged).collect()
}

/// Wrap a completed selection operation: cell writes, restyle, then the
/// selection-changed notification.
fn finish(cell_changes: Vec<CellChange>) -> Vec<Action> {
    let mut actions = changes(cell_changes);
    actions.push(Action::RestyleNeeded);
    actions.push(Action::SelectionChanged);
    actions
}

/// The full grid engine. Wraps `EngineCore` and drives a surface and an observer.
pub struct Engine<S, O> {
    pub core: EngineCore,
    surface: S,
    observer: O,
}

impl<S: Surface, O: Observer> Engine<S, O> {
    #[must_use]
    pub fn new(settings: Settings, surface: S, observer: O) -> Self {
        Self { core: EngineCore::new(settings), surface, observer }
    }

    /// Route actions to the surface and the observer, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first surface error.
    pub fn dispatch(&mut self, actions: Vec<Action>) -> Result<(), GridError> {
        for action in actions {
            match action {
                Action::GridLoaded => self.observer.grid_loaded(),
                Action::EmptyGrid => self.surface.draw_empty(&self.core)?,
                Action::RenderNeeded => self.surface.redraw(&self.core)?,
                Action::RestyleNeeded => self.surface.restyle(&self.core)?,
                Action::CellStateChanged(change) => {
                    if let Some(cell) = self.core.index.cell(&change.key) {
                        self.observer.cell_state_changed(cell, change.selected);
                    }
                }
                Action::SelectionChanged => self.observer.grid_selection_changed(),
            }
        }
        Ok(())
    }

    // --- Delegated operations ---

    /// Load and draw a grid.
    ///
    /// # Errors
    ///
    /// As [`EngineCore::load`], or a surface error.
    pub fn draw_grid(&mut self, data: GridData) -> Result<(), GridError> {
        let actions = self.core.load(data)?;
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// As [`EngineCore::select_cell`], or a surface error.
    pub fn select_cell(&mut self, key: &CellKey) -> Result<(), GridError> {
        let actions = self.core.select_cell(key)?;
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// As [`EngineCore::select_row`], or a surface error.
    pub fn select_row(&mut self, row: &EntityId) -> Result<(), GridError> {
        let actions = self.core.select_row(row)?;
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// As [`EngineCore::select_column`], or a surface error.
    pub fn select_column(&mut self, column: &EntityId) -> Result<(), GridError> {
        let actions = self.core.select_column(column)?;
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// As [`EngineCore::select_column_group`], or a surface error.
    pub fn select_column_group(&mut self, group: &EntityId) -> Result<(), GridError> {
        let actions = self.core.select_column_group(group)?;
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Surface errors.
    pub fn reset_selection(&mut self) -> Result<(), GridError> {
        let actions = self.core.reset_selection();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Surface errors.
    pub fn select_all(&mut self) -> Result<(), GridError> {
        let actions = self.core.select_all();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Surface errors.
    pub fn reorder(&mut self, rows: SortSpec, columns: SortSpec) -> Result<(), GridError> {
        let actions = self.core.reorder(rows, columns);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Surface errors.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<(), GridError> {
        let actions = self.core.set_viewport(width, height);
        self.dispatch(actions)
    }

    /// Drawn cells that are selected, in display order.
    #[must_use]
    pub fn selected_cells(&self) -> Vec<&Cell> {
        self.core.selected_cells()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
