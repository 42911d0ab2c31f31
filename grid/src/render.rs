//! Rendering: draws the grid as SVG markup.
//!
//! This module receives a read-only view of engine state and produces markup.
//! It does not mutate any application state. Selection and hover are expressed
//! as CSS classes (`active` on selected cells and hovered labels, and on the
//! column backgrounds of the hovered group) so a host stylesheet decides the look.
//!
//! All writes go through [`std::fmt::Write`]; the surface converts failures
//! into [`GridError::Surface`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::{self, Write};

use crate::consts::{BRACKET_OFFSET, CELL_FONT_RATIO, CELL_WIDTH, GROUP_LABEL_OFFSET, LABEL_GAP, ROW_LABEL_WIDTH};
use crate::engine::EngineCore;
use crate::error::GridError;
use crate::index::{CellKey, Entity, RowEntity};
use crate::layout::{self, Layout};
use crate::surface::Surface;

/// Group bracket label color.
const BRACKET_TEXT_FILL: &str = "#AAAAAA";
/// Group bracket stroke.
const BRACKET_STROKE: &str = "stroke: #999999; stroke-width: 0.5px; fill: none;";
/// Width of the tinted background behind column labels.
const COLUMN_BACKGROUND_WIDTH: f64 = 100.0;
/// Column background opacity while its group is hovered.
const GROUP_HIGHLIGHT_OPACITY: f64 = 0.35;
/// Column background tint while its group is hovered.
const GROUP_HIGHLIGHT_FILL: &str = "#333333";

/// A [`Surface`] that keeps the latest drawing as an SVG string.
#[derive(Debug, Default, Clone)]
pub struct SvgSurface {
    markup: String,
}

impl SvgSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest drawing.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Surface for SvgSurface {
    fn redraw(&mut self, core: &EngineCore) -> Result<(), GridError> {
        let mut out = String::new();
        draw(&mut out, core)?;
        self.markup = out;
        Ok(())
    }

    // Styling lives in class attributes, so a restyle is a full redraw.
    fn restyle(&mut self, core: &EngineCore) -> Result<(), GridError> {
        self.redraw(core)
    }

    fn draw_empty(&mut self, core: &EngineCore) -> Result<(), GridError> {
        let mut out = String::new();
        draw_empty(&mut out, &core.settings.empty_message)?;
        self.markup = out;
        Ok(())
    }
}

/// Draw the full grid.
///
/// # Errors
///
/// Returns `Err` if writing to `out` fails.
pub fn draw(out: &mut impl Write, core: &EngineCore) -> fmt::Result {
    if core.index.is_empty() {
        return draw_empty(out, &core.settings.empty_message);
    }
    let layout = core.layout();

    // Layer 1: canvas and background.
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="digviewer" width="{}" height="{}">"#,
        layout.svg_width, layout.svg_height
    )?;
    write!(out, r#"<g transform="translate({},{})">"#, layout.origin.x, layout.origin.y)?;
    write!(
        out,
        r#"<rect class="background cell_border" id="gridBackground" width="{}" height="{}" pointer-events="none"/>"#,
        layout.matrix_width, layout.matrix_height
    )?;

    // Layer 2: rows with their cells and labels.
    for row in core.index.rows() {
        let Some(y) = layout.row_y(&row.id) else {
            continue;
        };
        write!(
            out,
            r#"<g class="row" data-row="{}" transform="translate(0,{y})">"#,
            Escaped(row.id.as_str())
        )?;
        draw_cells(out, core, &layout, row)?;
        write!(out, r#"<line class="cell_border" x2="{}" pointer-events="none"/>"#, layout.matrix_width)?;
        write!(
            out,
            r#"<rect class="backgroundRow" x="{}" width="{ROW_LABEL_WIDTH}" height="{}" style="fill: white;"/>"#,
            -ROW_LABEL_WIDTH,
            layout.cell_height()
        )?;
        write!(
            out,
            r#"<text class="{}" x="{}" y="{}" dy=".32em" text-anchor="end" style="font-size:{}em;"><title>{}</title>{}</text>"#,
            class("rtext", core.ui.is_row_active(&row.id)),
            -LABEL_GAP,
            layout.band_height / 2.0,
            layout.font_size_em,
            Escaped(row.name().unwrap_or_default()),
            Escaped(row.display_label())
        )?;
        out.write_str("</g>")?;
    }

    // Layer 3: column labels.
    for column in core.index.columns() {
        let Some(x) = layout.column_x(&column.id) else {
            continue;
        };
        write!(
            out,
            r#"<g class="column" data-column="{}" transform="translate({x})rotate(-90)">"#,
            Escaped(column.id.as_str())
        )?;
        write!(out, r#"<line class="cell_border" x1="{}" pointer-events="none"/>"#, -layout.matrix_height)?;
        let highlighted = column
            .group
            .as_ref()
            .is_some_and(|g| core.ui.is_group_highlighted(g));
        let (fill, opacity) = if highlighted { (GROUP_HIGHLIGHT_FILL, GROUP_HIGHLIGHT_OPACITY) } else { ("white", 0.0) };
        write!(
            out,
            r#"<rect class="{}" width="{COLUMN_BACKGROUND_WIDTH}" height="{}" style="fill: {fill}; fill-opacity: {opacity};"/>"#,
            class("backgroundColumn", highlighted),
            layout.cell_height()
        )?;
        write!(
            out,
            r#"<text class="{}" x="{LABEL_GAP}" y="{}" dy=".42em" text-anchor="start" style="font-size:{}em;">{}</text>"#,
            class("ctext", core.ui.is_column_active(&column.id)),
            layout.band_width / 2.0,
            layout.font_size_em,
            Escaped(column.display_label())
        )?;
        out.write_str("</g>")?;
    }

    // Layer 4: group brackets.
    if core.settings.display_brackets && core.index.has_groups() {
        draw_brackets(out, core, &layout)?;
    }

    out.write_str("</g></svg>")
}

fn draw_cells(out: &mut impl Write, core: &EngineCore, layout: &Layout, row: &RowEntity) -> fmt::Result {
    let count_font = layout.font_size_em * CELL_FONT_RATIO;
    for column in core.index.columns() {
        let key = CellKey { row: row.id.clone(), column: column.id.clone() };
        let Some(cell) = core.index.cell(&key).filter(|c| c.is_visible()) else {
            continue;
        };
        let Some(x) = layout.column_x(&column.id) else {
            continue;
        };
        write!(
            out,
            r#"<svg class="{}" data-column="{}" x="{x}">"#,
            class("cell", cell.selected),
            Escaped(column.id.as_str())
        )?;
        write!(
            out,
            r#"<rect width="{}" height="{}" style="fill: {};"/>"#,
            layout.band_width,
            layout.band_height,
            Escaped(core.settings.cell_color(cell))
        )?;
        write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" style="font-size: {count_font}em;" fill="black">{}</text>"#,
            layout.band_width / 2.0,
            layout.band_height / 2.0,
            cell.count
        )?;
        out.write_str("</svg>")?;
    }
    Ok(())
}

fn draw_brackets(out: &mut impl Write, core: &EngineCore, layout: &Layout) -> fmt::Result {
    let half_cell = (CELL_WIDTH - layout.reduction) / 2.0;

    for span in layout::bracket_spans(&core.index, layout) {
        let path = layout::curly_bracket_path(
            span.max_x + 2.0 * half_cell - 2.0,
            -BRACKET_OFFSET,
            span.min_x + 2.0,
            -BRACKET_OFFSET,
        );
        write!(out, r#"<path style="{BRACKET_STROKE}" d="{path}"/>"#)?;

        let label = core
            .index
            .group(&span.group)
            .map_or(span.group.as_str(), |g| g.display_label());
        let center = span.min_x + (span.max_x - span.min_x) / 2.0 + half_cell;
        write!(
            out,
            r#"<text class="{}" data-group="{}" style="fill: {BRACKET_TEXT_FILL};" x="{GROUP_LABEL_OFFSET}" dy=".32em" transform="translate({center})rotate(-90)">{}</text>"#,
            class("column_category", core.ui.is_group_highlighted(&span.group)),
            Escaped(span.group.as_str()),
            Escaped(label)
        )?;
    }
    Ok(())
}

/// Draw the empty-dataset message in place of the grid.
///
/// # Errors
///
/// Returns `Err` if writing to `out` fails.
pub fn draw_empty(out: &mut impl Write, message: &str) -> fmt::Result {
    write!(
        out,
        r#"<div style="display:flex; justify-content:center; width:100%; height:100%;"><div id="noDatasetsMessageDiv" style="align-self: center; font-size: large;"><span id="noDatasetsMessageSpan">{}</span></div></div>"#,
        Escaped(message)
    )
}

fn class(base: &str, active: bool) -> String {
    if active { format!("{base} active") } else { base.to_string() }
}

/// Text escaped for SVG content and attribute values.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => f.write_char(ch)?,
            }
        }
        Ok(())
    }
}
