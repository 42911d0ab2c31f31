//! Seams between the engine and the outside world.
//!
//! A [`Surface`] draws whatever [`EngineCore`] currently holds; it never
//! mutates engine state. An [`Observer`] receives the host-facing
//! notifications. Both are driven by [`crate::engine::Engine`].

use crate::engine::EngineCore;
use crate::error::GridError;
use crate::index::Cell;

/// Something that can draw the grid.
pub trait Surface {
    /// Full redraw: layout, labels, brackets, and cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if drawing fails.
    fn redraw(&mut self, core: &EngineCore) -> Result<(), GridError>;

    /// Re-apply selection and hover styling without moving anything.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if drawing fails.
    fn restyle(&mut self, core: &EngineCore) -> Result<(), GridError>;

    /// Replace the grid with the empty-dataset message.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] if drawing fails.
    fn draw_empty(&mut self, core: &EngineCore) -> Result<(), GridError>;
}

/// Host callbacks. Every method defaults to doing nothing.
pub trait Observer {
    /// A grid (possibly empty) finished loading.
    fn grid_loaded(&mut self) {}

    /// A cell was written. Called for each cell an operation touches.
    fn cell_state_changed(&mut self, _cell: &Cell, _selected: bool) {}

    /// A selection operation or drag finished.
    fn grid_selection_changed(&mut self) {}
}

impl Observer for () {}
