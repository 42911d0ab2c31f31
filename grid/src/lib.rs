//! Selection grid engine for the dataset viewer.
//!
//! The grid shows one row per row entity, one column per column entity, and a
//! cell wherever a dataset exists for that row/column pair. Cells display the
//! number of items in their dataset and can be selected one at a time, a whole
//! row, column or column group at a time, or by dragging across cells.
//!
//! The crate owns the index and the selection state machine. Drawing happens
//! behind the [`surface::Surface`] trait and host notifications behind
//! [`surface::Observer`]; [`engine::EngineCore`] only emits
//! [`engine::Action`]s, so the whole interaction model is testable without a
//! browser. The host layer (a web page through [`web::DigViewer`], or the
//! command-line host) wires raw pointer events into the engine.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`index`] | Entities, cells, and the `(row, column)` index |
//! | [`selection`] | Toggle and group selection rules |
//! | [`input`] | Pointer targets, drag lock, and hover state |
//! | [`hit`] | Mapping grid coordinates to pointer targets |
//! | [`layout`] | Cell sizing, band positions, bracket geometry |
//! | [`render`] | SVG rendering surface |
//! | [`settings`] | Host-supplied configuration |
//! | [`surface`] | Rendering surface and observer traits |
//! | [`web`] | `wasm-bindgen` binding for host pages |
//! | [`consts`] | Shared numeric constants |
//! | [`error`] | Error type |

pub mod consts;
pub mod engine;
pub mod error;
pub mod hit;
pub mod index;
pub mod input;
pub mod layout;
pub mod render;
pub mod selection;
pub mod settings;
pub mod surface;
pub mod web;

pub use engine::{Action, Engine, EngineCore};
pub use error::GridError;
pub use index::{Cell, CellKey, ColumnEntity, ColumnGroup, EntityId, GridData, GridIndex, RowEntity};
pub use settings::{Settings, SortKey, SortSpec};
