//! Selection scripts: one command per line, replayed against an engine.
//!
//! ```text
//! # comments and blank lines are ignored
//! cell r1 c2
//! row r1
//! column c3
//! group g1
//! drag r1 c1 r1 c2 r2 c2
//! sort columns name desc
//! all
//! reset
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use grid::input::{Button, Target};
use grid::surface::{Observer, Surface};
use grid::{CellKey, Engine, EntityId, GridError, SortKey, SortSpec};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: `{command}` expects {expected}")]
    Arguments { line: usize, command: String, expected: &'static str },
    #[error("line {line}: unknown sort key `{key}`")]
    SortKey { line: usize, key: String },
}

/// Which axis a `sort` command reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Cell(CellKey),
    Row(EntityId),
    Column(EntityId),
    Group(EntityId),
    All,
    Reset,
    /// Press on the first cell, move across the rest, release.
    Drag(Vec<CellKey>),
    Sort(Axis, SortSpec),
}

/// Parse a script.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        // A comment starts at a word beginning with `#`; ids may contain `#` elsewhere.
        let mut words = raw.split_whitespace().take_while(|word| !word.starts_with('#'));
        let Some(name) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();
        commands.push(parse_command(line, name, &args)?);
    }
    Ok(commands)
}

fn parse_command(line: usize, name: &str, args: &[&str]) -> Result<Command, ScriptError> {
    let arguments = |expected| ScriptError::Arguments { line, command: name.to_owned(), expected };
    match (name, args) {
        ("cell", [row, column]) => Ok(Command::Cell(CellKey::new(*row, *column))),
        ("cell", _) => Err(arguments("a row and a column")),
        ("row", [row]) => Ok(Command::Row(EntityId::from(*row))),
        ("column", [column]) => Ok(Command::Column(EntityId::from(*column))),
        ("group", [group]) => Ok(Command::Group(EntityId::from(*group))),
        ("row" | "column" | "group", _) => Err(arguments("one id")),
        ("all", []) => Ok(Command::All),
        ("reset", []) => Ok(Command::Reset),
        ("all" | "reset", _) => Err(arguments("no arguments")),
        ("drag", pairs) if !pairs.is_empty() && pairs.len() % 2 == 0 => Ok(Command::Drag(
            pairs.chunks_exact(2).map(|pair| CellKey::new(pair[0], pair[1])).collect(),
        )),
        ("drag", _) => Err(arguments("row/column pairs")),
        ("sort", [axis, key, rest @ ..]) => {
            let axis = match *axis {
                "rows" => Axis::Rows,
                "columns" => Axis::Columns,
                _ => return Err(arguments("`rows` or `columns`")),
            };
            let descending = match rest {
                [] => false,
                ["desc"] => true,
                ["asc"] => false,
                _ => return Err(arguments("an optional `asc` or `desc`")),
            };
            Ok(Command::Sort(axis, SortSpec::new(parse_sort_key(line, key)?, descending)))
        }
        ("sort", _) => Err(arguments("an axis and a key")),
        _ => Err(ScriptError::UnknownCommand { line, command: name.to_owned() }),
    }
}

fn parse_sort_key(line: usize, key: &str) -> Result<SortKey, ScriptError> {
    match key {
        "input" => Ok(SortKey::Input),
        "id" => Ok(SortKey::Id),
        "name" => Ok(SortKey::Name),
        "label" => Ok(SortKey::Label),
        _ => Err(ScriptError::SortKey { line, key: key.to_owned() }),
    }
}

/// Run commands in order, stopping at the first failure.
///
/// # Errors
///
/// Unknown ids and surface failures, as reported by the engine. A `drag`
/// naming a cell with no dataset fails before any cell is written.
pub fn replay<S: Surface, O: Observer>(engine: &mut Engine<S, O>, commands: &[Command]) -> Result<(), GridError> {
    for command in commands {
        tracing::debug!(?command, "replay");
        match command {
            Command::Cell(key) => engine.select_cell(key)?,
            Command::Row(row) => engine.select_row(row)?,
            Command::Column(column) => engine.select_column(column)?,
            Command::Group(group) => engine.select_column_group(group)?,
            Command::All => engine.select_all()?,
            Command::Reset => engine.reset_selection()?,
            Command::Drag(cells) => drag(engine, cells)?,
            Command::Sort(axis, spec) => {
                let (rows, columns) = match axis {
                    Axis::Rows => (*spec, engine.core.settings.column_sort),
                    Axis::Columns => (engine.core.settings.row_sort, *spec),
                };
                engine.reorder(rows, columns)?;
            }
        }
    }
    Ok(())
}

fn drag<S: Surface, O: Observer>(engine: &mut Engine<S, O>, cells: &[CellKey]) -> Result<(), GridError> {
    if let Some(missing) = cells.iter().find(|key| engine.core.index.cell(key).is_none()) {
        return Err(GridError::UnknownCell { row: missing.row.clone(), column: missing.column.clone() });
    }
    let Some((first, rest)) = cells.split_first() else {
        return Ok(());
    };
    let actions = engine.core.on_pointer_down(&Target::Cell(first.clone()), Button::Primary);
    engine.dispatch(actions)?;
    for key in rest {
        let actions = engine.core.on_pointer_enter(&Target::Cell(key.clone()));
        engine.dispatch(actions)?;
    }
    let actions = engine.core.on_pointer_up();
    engine.dispatch(actions)
}
