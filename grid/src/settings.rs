//! Host-supplied grid configuration.
//!
//! Every field has a default so a host can pass `{}` (or nothing) and get the
//! stock behavior: datasets keyed by `row` / `column`, items under `data`,
//! brackets drawn over grouped columns, and entities shown in input order.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::index::Cell;

/// Fill color for cells with no color mapping.
pub const DEFAULT_CELL_COLOR: &str = "#AAA";

/// Message shown in place of the grid when there are no datasets.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No datasets available for the current settings!";

/// Which entity attribute rows or columns are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the order the host supplied.
    #[default]
    Input,
    /// Order by id; numeric ids compare numerically.
    Id,
    /// Order by name, falling back to the id.
    Name,
    /// Order by the displayed label.
    Label,
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }
}

/// Grid configuration, deserialized from host JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dataset field holding the row id.
    pub row_field: String,
    /// Dataset field holding the column id.
    pub column_field: String,
    /// Dataset field holding the item array whose length is the cell count.
    pub data_property: String,
    /// Draw curly brackets and labels over column groups.
    pub display_brackets: bool,
    /// Initial row order.
    pub row_sort: SortSpec,
    /// Initial column order.
    pub column_sort: SortSpec,
    /// Dataset field looked up in `colors` to pick a cell fill.
    pub color_field: Option<String>,
    /// Fill color per `color_field` value.
    pub colors: BTreeMap<String, String>,
    /// Fill used when no mapping applies.
    pub default_color: String,
    /// Text shown when the grid has no datasets.
    pub empty_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            row_field: "row".into(),
            column_field: "column".into(),
            data_property: "data".into(),
            display_brackets: true,
            row_sort: SortSpec::default(),
            column_sort: SortSpec::default(),
            color_field: None,
            colors: BTreeMap::new(),
            default_color: DEFAULT_CELL_COLOR.into(),
            empty_message: DEFAULT_EMPTY_MESSAGE.into(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON object. An empty or blank string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidJson`] when the input is not a valid settings object.
    pub fn from_json(raw: &str) -> Result<Self, GridError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Fill color for a cell.
    #[must_use]
    pub fn cell_color(&self, cell: &Cell) -> &str {
        self.color_field
            .as_deref()
            .and_then(|field| cell.record.get(field))
            .and_then(|value| match value {
                serde_json::Value::String(s) => self.colors.get(s.as_str()),
                serde_json::Value::Number(n) => self.colors.get(n.to_string().as_str()),
                _ => None,
            })
            .map_or(self.default_color.as_str(), String::as_str)
    }
}
