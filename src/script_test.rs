use grid::index::{ColumnEntity, RowEntity};
use grid::render::SvgSurface;
use grid::{GridData, Settings};
use serde_json::json;

use super::*;

fn engine() -> Engine<SvgSurface, ()> {
    let mut engine = Engine::new(Settings::default(), SvgSurface::new(), ());
    engine
        .draw_grid(GridData {
            datasets: vec![
                json!({ "row": "r1", "column": "c1", "data": [1] }),
                json!({ "row": "r1", "column": "c2", "data": [1, 2] }),
                json!({ "row": "r2", "column": "c1", "data": [1] }),
                json!({ "row": "r2", "column": "c2", "data": [1] }),
            ],
            rows: vec![RowEntity::new("r1", "Alpha"), RowEntity::new("r2", "Beta")],
            columns: vec![
                ColumnEntity::new("c1", "One").in_group("g"),
                ColumnEntity::new("c2", "Two").in_group("g"),
            ],
            groups: Vec::new(),
        })
        .unwrap();
    engine
}

fn selected(engine: &Engine<SvgSurface, ()>) -> Vec<String> {
    engine
        .selected_cells()
        .iter()
        .map(|c| format!("{}/{}", c.row, c.column))
        .collect()
}

// =============================================================
// parse
// =============================================================

#[test]
fn parse_every_command() {
    let commands = parse(
        "cell r1 c1\nrow r1\ncolumn c2\ngroup g\nall\nreset\ndrag r1 c1 r2 c1\nsort rows name desc\nsort columns id\n",
    )
    .unwrap();
    assert_eq!(
        commands,
        vec![
            Command::Cell(CellKey::new("r1", "c1")),
            Command::Row(EntityId::from("r1")),
            Command::Column(EntityId::from("c2")),
            Command::Group(EntityId::from("g")),
            Command::All,
            Command::Reset,
            Command::Drag(vec![CellKey::new("r1", "c1"), CellKey::new("r2", "c1")]),
            Command::Sort(Axis::Rows, SortSpec::new(SortKey::Name, true)),
            Command::Sort(Axis::Columns, SortSpec::new(SortKey::Id, false)),
        ]
    );
}

#[test]
fn parse_skips_comments_and_blank_lines() {
    let commands = parse("# header\n\n   \nall  # everything\n").unwrap();
    assert_eq!(commands, vec![Command::All]);
}

#[test]
fn parse_keeps_hash_inside_ids() {
    let commands = parse("cell r#1 c1 #trailing note\nrow a#b\n").unwrap();
    assert_eq!(
        commands,
        vec![Command::Cell(CellKey::new("r#1", "c1")), Command::Row(EntityId::from("a#b"))]
    );
}

#[test]
fn parse_reports_line_of_unknown_command() {
    match parse("all\nexplode\n") {
        Err(ScriptError::UnknownCommand { line, command }) => {
            assert_eq!(line, 2);
            assert_eq!(command, "explode");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn parse_rejects_wrong_arity() {
    assert!(matches!(parse("cell r1"), Err(ScriptError::Arguments { line: 1, .. })));
    assert!(matches!(parse("row"), Err(ScriptError::Arguments { .. })));
    assert!(matches!(parse("all now"), Err(ScriptError::Arguments { .. })));
    assert!(matches!(parse("drag r1"), Err(ScriptError::Arguments { .. })));
    assert!(matches!(parse("drag"), Err(ScriptError::Arguments { .. })));
    assert!(matches!(parse("sort diagonals id"), Err(ScriptError::Arguments { .. })));
    assert!(matches!(parse("sort rows id sideways"), Err(ScriptError::Arguments { .. })));
}

#[test]
fn parse_rejects_unknown_sort_key() {
    assert!(matches!(parse("sort rows size"), Err(ScriptError::SortKey { .. })));
}

// =============================================================
// replay
// =============================================================

#[test]
fn replay_toggle_commands() {
    let mut engine = engine();
    replay(&mut engine, &parse("cell r1 c1\nrow r2").unwrap()).unwrap();
    assert_eq!(selected(&engine), vec!["r1/c1", "r2/c1", "r2/c2"]);

    // Column c1 is fully selected, so it clears.
    replay(&mut engine, &parse("column c1").unwrap()).unwrap();
    assert_eq!(selected(&engine), vec!["r2/c2"]);
}

#[test]
fn replay_group_all_and_reset() {
    let mut engine = engine();
    replay(&mut engine, &parse("group g").unwrap()).unwrap();
    assert_eq!(selected(&engine).len(), 4);
    replay(&mut engine, &parse("reset").unwrap()).unwrap();
    assert!(selected(&engine).is_empty());
    replay(&mut engine, &parse("all").unwrap()).unwrap();
    assert_eq!(selected(&engine).len(), 4);
}

#[test]
fn replay_drag_locks_mode() {
    let mut engine = engine();
    replay(&mut engine, &parse("cell r2 c2\ndrag r1 c1 r1 c2 r2 c2").unwrap()).unwrap();
    assert_eq!(selected(&engine), vec!["r1/c1", "r1/c2", "r2/c2"]);
    assert!(!engine.core.is_dragging());
}

#[test]
fn replay_deselect_drag() {
    let mut engine = engine();
    replay(&mut engine, &parse("all\ndrag r1 c1 r2 c1").unwrap()).unwrap();
    assert_eq!(selected(&engine), vec!["r1/c2", "r2/c2"]);
}

#[test]
fn replay_sort_keeps_other_axis() {
    let mut engine = engine();
    replay(&mut engine, &parse("sort columns id desc\nsort rows name desc").unwrap()).unwrap();
    assert_eq!(engine.core.settings.column_sort, SortSpec::new(SortKey::Id, true));
    assert_eq!(engine.core.settings.row_sort, SortSpec::new(SortKey::Name, true));
    assert_eq!(engine.core.index.row_at(0).map(|r| r.id.as_str()), Some("r2"));
    assert_eq!(engine.core.index.column_at(0).map(|c| c.id.as_str()), Some("c2"));
}

#[test]
fn replay_stops_at_unknown_id() {
    let mut engine = engine();
    let err = replay(&mut engine, &parse("cell r1 c1\nrow nope\ncell r2 c2").unwrap()).unwrap_err();
    assert!(matches!(err, GridError::UnknownRow(_)));
    assert_eq!(selected(&engine), vec!["r1/c1"]);
}

#[test]
fn replay_drag_unknown_cell_is_error() {
    let mut engine = engine();
    let err = replay(&mut engine, &parse("drag nope nada").unwrap()).unwrap_err();
    assert!(matches!(err, GridError::UnknownCell { .. }));

    // A bad cell anywhere in the path rejects the whole drag.
    let err = replay(&mut engine, &parse("drag r1 c1 r9 c1").unwrap()).unwrap_err();
    assert!(matches!(err, GridError::UnknownCell { .. }));
    assert!(selected(&engine).is_empty());
    assert!(!engine.core.is_dragging());
}
