use serde_json::json;

use super::*;
use crate::index::{CellKey, GridData, GridIndex};

fn single_cell(record: serde_json::Value, settings: &Settings) -> Cell {
    let index = GridIndex::build(GridData { datasets: vec![record], ..GridData::default() }, settings).unwrap();
    index.cell(&CellKey::new("r", "c")).unwrap().clone()
}

#[test]
fn defaults_match_stock_field_names() {
    let settings = Settings::default();
    assert_eq!(settings.row_field, "row");
    assert_eq!(settings.column_field, "column");
    assert_eq!(settings.data_property, "data");
    assert!(settings.display_brackets);
    assert_eq!(settings.row_sort, SortSpec::default());
    assert_eq!(settings.default_color, DEFAULT_CELL_COLOR);
}

#[test]
fn blank_json_is_default() {
    assert_eq!(Settings::from_json("  ").unwrap(), Settings::default());
    assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
}

#[test]
fn partial_json_keeps_other_defaults() {
    let settings = Settings::from_json(r#"{ "display_brackets": false, "row_sort": { "key": "name" } }"#).unwrap();
    assert!(!settings.display_brackets);
    assert_eq!(settings.row_sort, SortSpec::new(SortKey::Name, false));
    assert_eq!(settings.column_field, "column");
}

#[test]
fn invalid_json_is_an_error() {
    assert!(matches!(Settings::from_json("{ nope"), Err(GridError::InvalidJson(_))));
}

#[test]
fn unknown_sort_key_is_an_error() {
    assert!(Settings::from_json(r#"{ "row_sort": { "key": "size" } }"#).is_err());
}

#[test]
fn cell_color_falls_back_to_default() {
    let settings = Settings::default();
    let cell = single_cell(json!({ "row": "r", "column": "c", "data": [1] }), &settings);
    assert_eq!(settings.cell_color(&cell), "#AAA");
}

#[test]
fn cell_color_uses_mapping() {
    let mut settings = Settings { color_field: Some("institution".into()), ..Settings::default() };
    settings.colors.insert("mcgill".into(), "#C00".into());
    settings.colors.insert("4".into(), "#0C0".into());

    let cell = single_cell(json!({ "row": "r", "column": "c", "institution": "mcgill" }), &settings);
    assert_eq!(settings.cell_color(&cell), "#C00");

    let cell = single_cell(json!({ "row": "r", "column": "c", "institution": 4 }), &settings);
    assert_eq!(settings.cell_color(&cell), "#0C0");

    let cell = single_cell(json!({ "row": "r", "column": "c", "institution": "other" }), &settings);
    assert_eq!(settings.cell_color(&cell), "#AAA");
}
