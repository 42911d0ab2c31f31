//! `wasm-bindgen` binding for host pages.
//!
//! The host creates a [`DigViewer`] over a container element, registers its
//! callbacks, and forwards pointer events in SVG coordinates. Data crosses the
//! boundary as JSON strings; selected cells come back the same way.

use js_sys::{Function, JSON};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::engine::Engine;
use crate::engine::EngineCore;
use crate::error::GridError;
use crate::index::{Cell, CellKey, EntityId};
use crate::input::Button;
use crate::layout::Point;
use crate::render::SvgSurface;
use crate::settings::{Settings, SortSpec};
use crate::surface::{Observer, Surface};

/// Surface that mirrors the SVG drawing into a DOM container.
struct DomSurface {
    container: Element,
    svg: SvgSurface,
}

impl DomSurface {
    fn publish(&self) {
        self.container.set_inner_html(self.svg.markup());
    }
}

impl Surface for DomSurface {
    fn redraw(&mut self, core: &EngineCore) -> Result<(), GridError> {
        self.svg.redraw(core)?;
        self.publish();
        Ok(())
    }

    fn restyle(&mut self, core: &EngineCore) -> Result<(), GridError> {
        self.svg.restyle(core)?;
        self.publish();
        Ok(())
    }

    fn draw_empty(&mut self, core: &EngineCore) -> Result<(), GridError> {
        self.svg.draw_empty(core)?;
        self.publish();
        Ok(())
    }
}

/// Host callbacks registered from JavaScript.
#[derive(Default)]
struct JsObserver {
    on_grid_loaded: Option<Function>,
    on_cell_state_changed: Option<Function>,
    on_grid_selection_changed: Option<Function>,
}

impl Observer for JsObserver {
    fn grid_loaded(&mut self) {
        if let Some(callback) = &self.on_grid_loaded {
            report("onGridLoaded", callback.call0(&JsValue::NULL));
        }
    }

    fn cell_state_changed(&mut self, cell: &Cell, selected: bool) {
        if let Some(callback) = &self.on_cell_state_changed {
            let payload = cell_to_js(cell);
            report("onCellStateChanged", callback.call2(&JsValue::NULL, &payload, &JsValue::from_bool(selected)));
        }
    }

    fn grid_selection_changed(&mut self) {
        if let Some(callback) = &self.on_grid_selection_changed {
            report("onGridSelectionChanged", callback.call0(&JsValue::NULL));
        }
    }
}

fn report(name: &str, result: Result<JsValue, JsValue>) {
    if let Err(err) = result {
        tracing::warn!(callback = name, error = ?err, "host callback threw");
    }
}

fn cell_to_js(cell: &Cell) -> JsValue {
    match serde_json::to_string(cell) {
        Ok(json) => JSON::parse(&json).unwrap_or(JsValue::NULL),
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize cell");
            JsValue::NULL
        }
    }
}

/// Grid viewer bound to a DOM container.
#[wasm_bindgen]
pub struct DigViewer {
    engine: Engine<DomSurface, JsObserver>,
}

#[wasm_bindgen]
impl DigViewer {
    /// Create a viewer drawing into `container`. `settings` is a JSON object; blank means defaults.
    ///
    /// # Errors
    ///
    /// Fails when `settings` is not valid JSON settings.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element, settings: &str) -> Result<DigViewer, JsError> {
        let settings = Settings::from_json(settings)?;
        let surface = DomSurface { container, svg: SvgSurface::new() };
        Ok(Self { engine: Engine::new(settings, surface, JsObserver::default()) })
    }

    #[wasm_bindgen(js_name = onGridLoaded)]
    pub fn set_on_grid_loaded(&mut self, callback: Function) {
        self.engine.observer_mut().on_grid_loaded = Some(callback);
    }

    #[wasm_bindgen(js_name = onCellStateChanged)]
    pub fn set_on_cell_state_changed(&mut self, callback: Function) {
        self.engine.observer_mut().on_cell_state_changed = Some(callback);
    }

    #[wasm_bindgen(js_name = onGridSelectionChanged)]
    pub fn set_on_grid_selection_changed(&mut self, callback: Function) {
        self.engine.observer_mut().on_grid_selection_changed = Some(callback);
    }

    /// Load and draw a grid from JSON arrays.
    ///
    /// # Errors
    ///
    /// Malformed JSON, missing keys, or duplicate row/column pairs.
    #[wasm_bindgen(js_name = drawGrid)]
    pub fn draw_grid(&mut self, datasets: &str, rows: &str, columns: &str, groups: &str) -> Result<(), JsError> {
        let actions = self.engine.core.load_json(datasets, rows, columns, groups)?;
        Ok(self.engine.dispatch(actions)?)
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        Ok(self.engine.set_viewport(width, height)?)
    }

    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: &str, column: &str) -> Result<(), JsError> {
        Ok(self.engine.select_cell(&CellKey::new(row, column))?)
    }

    #[wasm_bindgen(js_name = selectRow)]
    pub fn select_row(&mut self, row: &str) -> Result<(), JsError> {
        Ok(self.engine.select_row(&EntityId::from(row))?)
    }

    #[wasm_bindgen(js_name = selectColumn)]
    pub fn select_column(&mut self, column: &str) -> Result<(), JsError> {
        Ok(self.engine.select_column(&EntityId::from(column))?)
    }

    #[wasm_bindgen(js_name = selectColumnGroup)]
    pub fn select_column_group(&mut self, group: &str) -> Result<(), JsError> {
        Ok(self.engine.select_column_group(&EntityId::from(group))?)
    }

    #[wasm_bindgen(js_name = resetSelection)]
    pub fn reset_selection(&mut self) -> Result<(), JsError> {
        Ok(self.engine.reset_selection()?)
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) -> Result<(), JsError> {
        Ok(self.engine.select_all()?)
    }

    /// Selected, drawn cells as a JSON array.
    #[wasm_bindgen(js_name = selectedCells)]
    pub fn selected_cells(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.selected_cells())?)
    }

    /// Re-sort rows and columns. Each argument is a JSON sort spec; blank keeps input order.
    #[wasm_bindgen(js_name = reorderGrid)]
    pub fn reorder_grid(&mut self, rows: &str, columns: &str) -> Result<(), JsError> {
        let rows = parse_sort(rows)?;
        let columns = parse_sort(columns)?;
        Ok(self.engine.reorder(rows, columns)?)
    }

    // --- Pointer events, in SVG coordinates ---

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsError> {
        let actions = self.engine.core.on_pointer_move(Point::new(x, y));
        Ok(self.engine.dispatch(actions)?)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<(), JsError> {
        let actions = self.engine.core.on_pointer_down_at(Point::new(x, y), Button::from_dom(button));
        Ok(self.engine.dispatch(actions)?)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<(), JsError> {
        let actions = self.engine.core.on_pointer_up();
        Ok(self.engine.dispatch(actions)?)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<(), JsError> {
        let actions = self.engine.core.on_grid_leave();
        Ok(self.engine.dispatch(actions)?)
    }

    pub fn click(&mut self, x: f64, y: f64) -> Result<(), JsError> {
        let actions = self.engine.core.on_click_at(Point::new(x, y))?;
        Ok(self.engine.dispatch(actions)?)
    }
}

fn parse_sort(raw: &str) -> Result<SortSpec, GridError> {
    if raw.trim().is_empty() {
        return Ok(SortSpec::default());
    }
    Ok(serde_json::from_str(raw)?)
}
