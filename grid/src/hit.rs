#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{BRACKET_OFFSET, COLUMN_LABEL_HEIGHT, ROW_LABEL_WIDTH};
use crate::index::{CellKey, GridIndex};
use crate::input::Target;
use crate::layout::{Layout, Point};

/// Find what lies under an SVG-space point.
///
/// Cells without items are not drawn, so a point over one hits `Background`.
/// Above the grid, the band nearest the grid holds column labels and the band
/// beyond the brackets holds group labels when `brackets` is set.
/// Returns `None` outside the grid and its label areas.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hit_test(svg_pt: Point, index: &GridIndex, layout: &Layout, brackets: bool) -> Option<Target> {
    let p = layout.to_grid(svg_pt);
    let in_columns = p.x >= 0.0 && p.x < layout.matrix_width;
    let in_rows = p.y >= 0.0 && p.y < layout.matrix_height;

    if in_columns && in_rows {
        let row = index.row_at((p.y / layout.band_height) as usize)?;
        let column = index.column_at((p.x / layout.band_width) as usize)?;
        let key = CellKey { row: row.id.clone(), column: column.id.clone() };
        return Some(match index.cell(&key) {
            Some(cell) if cell.is_visible() => Target::Cell(key),
            _ => Target::Background,
        });
    }

    if in_rows && p.x < 0.0 && p.x >= -ROW_LABEL_WIDTH {
        let row = index.row_at((p.y / layout.band_height) as usize)?;
        return Some(Target::RowLabel(row.id.clone()));
    }

    if in_columns && p.y < 0.0 && p.y >= -COLUMN_LABEL_HEIGHT {
        let column = index.column_at((p.x / layout.band_width) as usize)?;
        if p.y >= -BRACKET_OFFSET {
            return Some(Target::ColumnLabel(column.id.clone()));
        }
        return match column.group.as_ref() {
            Some(group) if brackets => Some(Target::GroupLabel(group.clone())),
            _ => Some(Target::Background),
        };
    }

    None
}
