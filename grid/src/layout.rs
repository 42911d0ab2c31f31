//! Layout arithmetic: cell sizing, band positions, and bracket geometry.
//!
//! All coordinates are relative to the grid origin (top-left corner of the
//! first cell) unless noted. Labels extend into negative space: row labels to
//! the left, column labels and group brackets above.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashMap;

use crate::consts::{
    BRACKET_CURVE, BRACKET_WIDTH, CELL_HEIGHT, CELL_WIDTH, CELL_WIDTH_FACTOR, COLUMN_LABEL_HEIGHT,
    FONT_SCALE_DOMAIN_MAX, FONT_SCALE_MIN, MIN_CELL_SIZE, RESIZE_MIN_COLUMNS, ROW_LABEL_MARGIN, ROW_LABEL_WIDTH, VIEWPORT_MARGIN,
};
use crate::index::{EntityId, GridIndex};

/// A point in SVG or grid space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sizes and positions for one drawing of the grid.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Pixels removed from each cell side when there are many columns.
    pub width_reduction: f64,
    /// `width_reduction` rounded; drives font size and bracket spacing.
    pub reduction: f64,
    /// Label font size in `em`.
    pub font_size_em: f64,
    /// Width of one column band.
    pub band_width: f64,
    /// Height of one row band.
    pub band_height: f64,
    pub matrix_width: f64,
    pub matrix_height: f64,
    pub svg_width: f64,
    pub svg_height: f64,
    /// Grid origin in SVG space.
    pub origin: Point,
    row_y: HashMap<EntityId, f64>,
    column_x: HashMap<EntityId, f64>,
}

impl Layout {
    /// Lay out `index` in its current display order for a container of the given size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(index: &GridIndex, viewport_width: f64, viewport_height: f64) -> Self {
        let columns = index.column_count();
        let rows = index.row_count();

        // Cells never shrink below MIN_CELL_SIZE, however many columns there are.
        let width_reduction = if columns >= RESIZE_MIN_COLUMNS {
            (columns as f64 / CELL_WIDTH_FACTOR - 1.0).min(CELL_WIDTH - MIN_CELL_SIZE)
        } else {
            0.0
        };
        let reduction = width_reduction.round();

        let matrix_width = (CELL_WIDTH - width_reduction) * columns as f64;
        let matrix_height = (CELL_HEIGHT - width_reduction) * rows as f64;
        let band_width = band(matrix_width, columns);
        let band_height = band(matrix_height, rows);

        let row_y = index
            .rows()
            .enumerate()
            .map(|(i, row)| (row.id.clone(), i as f64 * band_height))
            .collect();
        let column_x = index
            .columns()
            .enumerate()
            .map(|(i, column)| (column.id.clone(), i as f64 * band_width))
            .collect();

        Self {
            width_reduction,
            reduction,
            font_size_em: font_scale(reduction),
            band_width,
            band_height,
            matrix_width,
            matrix_height,
            svg_width: (matrix_width + ROW_LABEL_WIDTH * 2.0).max(viewport_width - VIEWPORT_MARGIN),
            svg_height: (matrix_height + COLUMN_LABEL_HEIGHT + VIEWPORT_MARGIN).max(viewport_height - VIEWPORT_MARGIN),
            origin: Point::new(ROW_LABEL_WIDTH * ROW_LABEL_MARGIN, COLUMN_LABEL_HEIGHT),
            row_y,
            column_x,
        }
    }

    /// Top edge of a row band.
    #[must_use]
    pub fn row_y(&self, id: &EntityId) -> Option<f64> {
        self.row_y.get(id).copied()
    }

    /// Left edge of a column band.
    #[must_use]
    pub fn column_x(&self, id: &EntityId) -> Option<f64> {
        self.column_x.get(id).copied()
    }

    /// Convert an SVG-space point to grid space.
    #[must_use]
    pub fn to_grid(&self, svg: Point) -> Point {
        Point::new(svg.x - self.origin.x, svg.y - self.origin.y)
    }

    /// Height of the drawn cell rectangle; the label backgrounds use the same.
    #[must_use]
    pub fn cell_height(&self) -> f64 {
        CELL_HEIGHT - self.width_reduction
    }
}

#[allow(clippy::cast_precision_loss)]
fn band(extent: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { extent / count as f64 }
}

/// Linear label font scale: 1em at no reduction down to 0.6em at 30.
#[must_use]
pub fn font_scale(reduction: f64) -> f64 {
    1.0 + (FONT_SCALE_MIN - 1.0) * (reduction / FONT_SCALE_DOMAIN_MAX)
}

/// Horizontal extent of a column group.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketSpan {
    pub group: EntityId,
    /// Left edge of the group's first column.
    pub min_x: f64,
    /// Left edge of the group's last column.
    pub max_x: f64,
}

/// One span per group, in order of first appearance among displayed columns.
#[must_use]
pub fn bracket_spans(index: &GridIndex, layout: &Layout) -> Vec<BracketSpan> {
    let mut spans: Vec<BracketSpan> = Vec::new();
    for column in index.columns() {
        let (Some(group), Some(x)) = (column.group.as_ref(), layout.column_x(&column.id)) else {
            continue;
        };
        match spans.iter_mut().find(|s| &s.group == group) {
            Some(span) => {
                span.min_x = span.min_x.min(x);
                span.max_x = span.max_x.max(x);
            }
            None => spans.push(BracketSpan { group: group.clone(), min_x: x, max_x: x }),
        }
    }
    spans
}

/// SVG path data for a curly brace from `(x1, y1)` to `(x2, y2)`.
///
/// The brace points to the left of the direction of travel.
#[must_use]
pub fn curly_bracket_path(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    let w = BRACKET_WIDTH;
    let q = BRACKET_CURVE;

    let len = (x1 - x2).hypot(y1 - y2);
    if len == 0.0 {
        return format!("M {x1} {y1}");
    }
    let dx = (x1 - x2) / len;
    let dy = (y1 - y2) / len;

    let qx1 = x1 + q * w * dy;
    let qy1 = y1 - q * w * dx;
    let qx2 = (x1 - 0.25 * len * dx) + (1.0 - q) * w * dy;
    let qy2 = (y1 - 0.25 * len * dy) - (1.0 - q) * w * dx;
    let tx1 = (x1 - 0.5 * len * dx) + w * dy;
    let ty1 = (y1 - 0.5 * len * dy) - w * dx;
    let qx3 = x2 + q * w * dy;
    let qy3 = y2 - q * w * dx;
    let qx4 = (x1 - 0.75 * len * dx) + (1.0 - q) * w * dy;
    let qy4 = (y1 - 0.75 * len * dy) - (1.0 - q) * w * dx;

    format!(
        "M {x1} {y1} Q {qx1} {qy1} {qx2} {qy2} T {tx1} {ty1} M {x2} {y2} Q {qx3} {qy3} {qx4} {qy4} T {tx1} {ty1}"
    )
}
