//! Shared numeric constants for the grid crate.

// ── Cells ───────────────────────────────────────────────────────

/// Nominal cell width before any size reduction, in pixels.
pub const CELL_WIDTH: f64 = 26.0;

/// Nominal cell height before any size reduction, in pixels.
pub const CELL_HEIGHT: f64 = 26.0;

// ── Labels ──────────────────────────────────────────────────────

/// Horizontal space reserved for row labels, in pixels.
pub const ROW_LABEL_WIDTH: f64 = 200.0;

/// Vertical space reserved for column labels, in pixels.
pub const COLUMN_LABEL_HEIGHT: f64 = 200.0;

/// Multiplier applied to the row label width to place the grid origin.
pub const ROW_LABEL_MARGIN: f64 = 1.2;

/// Gap between a label and the grid edge, in pixels.
pub const LABEL_GAP: f64 = 6.0;

// ── Resizing ────────────────────────────────────────────────────

/// Column count at which cells start shrinking.
pub const RESIZE_MIN_COLUMNS: usize = 20;

/// Columns per pixel of cell shrink. Lower values shrink faster.
pub const CELL_WIDTH_FACTOR: f64 = 12.0;

/// Smallest cell side after shrinking, in pixels.
pub const MIN_CELL_SIZE: f64 = 1.0;

/// Reduction factor at which the label font reaches its smallest size.
pub const FONT_SCALE_DOMAIN_MAX: f64 = 30.0;

/// Smallest label font size, in `em`.
pub const FONT_SCALE_MIN: f64 = 0.6;

/// Cell count text size relative to the label font.
pub const CELL_FONT_RATIO: f64 = 0.8;

// ── Brackets ────────────────────────────────────────────────────

/// Distance above the grid at which group brackets are drawn.
pub const BRACKET_OFFSET: f64 = 80.0;

/// Width of a curly bracket, in pixels.
pub const BRACKET_WIDTH: f64 = 8.0;

/// Curly bracket expressiveness; 0.5 is a plain brace.
pub const BRACKET_CURVE: f64 = 0.6;

/// Distance above the grid at which group labels start.
pub const GROUP_LABEL_OFFSET: f64 = 90.0;

// ── Viewport ────────────────────────────────────────────────────

/// Margin kept between the SVG and its container, in pixels.
pub const VIEWPORT_MARGIN: f64 = 10.0;
