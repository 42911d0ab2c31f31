//! Grid model: row and column entities, dataset cells, and the sparse index.
//!
//! Datasets arrive as open-ended JSON records. Each record names its row and
//! column through configurable key fields; [`GridIndex::build`] turns the list
//! into a `(row, column) → cell` map and rejects a second record for a pair
//! that is already taken. Rows and columns keep their input order and a
//! separate display order, so re-sorting never moves cell storage.

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::GridError;
use crate::settings::{Settings, SortKey, SortSpec};

/// Identity of a row, column, or column group.
///
/// Hosts use either strings or numbers as ids; both are kept as their JSON
/// text so `7` and `"7"` name the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id from a JSON value. Only strings and numbers qualify.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Numeric-aware comparison: two integer ids compare by value, anything
    /// else compares as text.
    #[must_use]
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<i64>(), other.0.parse::<i64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => self.0.cmp(&other.0),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| serde::de::Error::custom("expected a string or number id"))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Common accessors for anything shown as a labelled row, column, or group.
pub trait Entity {
    fn id(&self) -> &EntityId;
    fn name(&self) -> Option<&str>;
    fn label(&self) -> Option<&str>;

    /// Text drawn for the entity: its label, else its name, else its id.
    fn display_label(&self) -> &str {
        self.label()
            .or_else(|| self.name())
            .unwrap_or_else(|| self.id().as_str())
    }
}

/// A grid row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowEntity {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Any other host fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A grid column, optionally belonging to a column group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEntity {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<EntityId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named set of columns, drawn under one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! impl_entity {
    ($($ty:ty),*) => {
        $(impl Entity for $ty {
            fn id(&self) -> &EntityId {
                &self.id
            }
            fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }
            fn label(&self) -> Option<&str> {
                self.label.as_deref()
            }
        })*
    };
}

impl_entity!(RowEntity, ColumnEntity, ColumnGroup);

impl RowEntity {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: EntityId::new(id), name: Some(name.into()), label: None, extra: Map::new() }
    }
}

impl ColumnEntity {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: EntityId::new(id), name: Some(name.into()), label: None, group: None, extra: Map::new() }
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(EntityId::new(group));
        self
    }
}

impl ColumnGroup {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: EntityId::new(id), name: Some(name.into()), label: None, extra: Map::new() }
    }
}

/// Address of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub row: EntityId,
    pub column: EntityId,
}

impl CellKey {
    #[must_use]
    pub fn new(row: impl Into<EntityId>, column: impl Into<EntityId>) -> Self {
        Self { row: row.into(), column: column.into() }
    }
}

/// One dataset placed in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub row: EntityId,
    pub column: EntityId,
    /// Number of items in the dataset's data array.
    pub count: usize,
    pub selected: bool,
    /// The host's original record.
    pub record: Value,
}

impl Cell {
    /// Only cells with at least one item are drawn and reachable by the pointer.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.count > 0
    }

    #[must_use]
    pub fn key(&self) -> CellKey {
        CellKey { row: self.row.clone(), column: self.column.clone() }
    }
}

/// Everything a host hands over to draw a grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridData {
    pub datasets: Vec<Value>,
    pub rows: Vec<RowEntity>,
    pub columns: Vec<ColumnEntity>,
    pub groups: Vec<ColumnGroup>,
}

/// Sparse `(row, column) → cell` index with display ordering.
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    rows: Vec<RowEntity>,
    columns: Vec<ColumnEntity>,
    groups: Vec<ColumnGroup>,
    row_order: Vec<usize>,
    column_order: Vec<usize>,
    row_lookup: HashMap<EntityId, usize>,
    column_lookup: HashMap<EntityId, usize>,
    cells: Vec<Cell>,
    by_key: HashMap<CellKey, usize>,
    by_row: HashMap<EntityId, Vec<usize>>,
}

impl GridIndex {
    /// Index `data.datasets` against the supplied entities.
    ///
    /// A record's `selected` boolean, when present, becomes the cell's initial
    /// state. Records naming rows or columns that are not among the entities
    /// are kept; they are reachable through row-keyed and grid-wide operations
    /// but are never drawn.
    ///
    /// # Errors
    ///
    /// [`GridError::MissingKey`] when a record has no string or number value
    /// under the configured row or column field, and
    /// [`GridError::DuplicateCell`] when two records share a row/column pair.
    pub fn build(data: GridData, settings: &Settings) -> Result<Self, GridError> {
        let GridData { datasets, rows, columns, groups } = data;

        let mut cells = Vec::with_capacity(datasets.len());
        let mut by_key = HashMap::with_capacity(datasets.len());
        let mut by_row: HashMap<EntityId, Vec<usize>> = HashMap::new();

        for (index, record) in datasets.into_iter().enumerate() {
            let row = key_field(&record, &settings.row_field, index)?;
            let column = key_field(&record, &settings.column_field, index)?;
            let key = CellKey { row: row.clone(), column: column.clone() };
            if by_key.contains_key(&key) {
                return Err(GridError::DuplicateCell { row, column });
            }

            let count = record
                .get(&settings.data_property)
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let selected = record
                .get("selected")
                .and_then(Value::as_bool)
                .unwrap_or(false);

            let slot = cells.len();
            by_key.insert(key, slot);
            by_row.entry(row.clone()).or_default().push(slot);
            cells.push(Cell { row, column, count, selected, record });
        }

        let row_lookup = lookup(&rows);
        let column_lookup = lookup(&columns);
        let orphans = cells
            .iter()
            .filter(|c| !row_lookup.contains_key(&c.row) || !column_lookup.contains_key(&c.column))
            .count();
        if orphans > 0 {
            tracing::warn!(orphans, "datasets reference rows or columns that are not displayed");
        }

        Ok(Self {
            row_order: (0..rows.len()).collect(),
            column_order: (0..columns.len()).collect(),
            rows,
            columns,
            groups,
            row_lookup,
            column_lookup,
            cells,
            by_key,
            by_row,
        })
    }

    // --- Entities ---

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &RowEntity> {
        self.row_order.iter().map(|&i| &self.rows[i])
    }

    /// Columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnEntity> {
        self.column_order.iter().map(|&i| &self.columns[i])
    }

    #[must_use]
    pub fn groups(&self) -> &[ColumnGroup] {
        &self.groups
    }

    #[must_use]
    pub fn row(&self, id: &EntityId) -> Option<&RowEntity> {
        self.row_lookup.get(id).map(|&i| &self.rows[i])
    }

    #[must_use]
    pub fn column(&self, id: &EntityId) -> Option<&ColumnEntity> {
        self.column_lookup.get(id).map(|&i| &self.columns[i])
    }

    #[must_use]
    pub fn group(&self, id: &EntityId) -> Option<&ColumnGroup> {
        self.groups.iter().find(|g| &g.id == id)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Display position of a row.
    #[must_use]
    pub fn row_position(&self, id: &EntityId) -> Option<usize> {
        let slot = *self.row_lookup.get(id)?;
        self.row_order.iter().position(|&i| i == slot)
    }

    /// Display position of a column.
    #[must_use]
    pub fn column_position(&self, id: &EntityId) -> Option<usize> {
        let slot = *self.column_lookup.get(id)?;
        self.column_order.iter().position(|&i| i == slot)
    }

    /// Row at a display position.
    #[must_use]
    pub fn row_at(&self, position: usize) -> Option<&RowEntity> {
        self.row_order.get(position).map(|&i| &self.rows[i])
    }

    /// Column at a display position.
    #[must_use]
    pub fn column_at(&self, position: usize) -> Option<&ColumnEntity> {
        self.column_order.get(position).map(|&i| &self.columns[i])
    }

    // --- Groups ---

    /// Whether any column belongs to a group.
    #[must_use]
    pub fn has_groups(&self) -> bool {
        self.columns.iter().any(|c| c.group.is_some())
    }

    /// The group a column belongs to.
    #[must_use]
    pub fn group_of(&self, column: &EntityId) -> Option<&EntityId> {
        self.column(column).and_then(|c| c.group.as_ref())
    }

    /// Columns of a group, in display order.
    pub fn columns_in_group<'a>(&'a self, group: &'a EntityId) -> impl Iterator<Item = &'a ColumnEntity> + 'a {
        self.columns().filter(move |c| c.group.as_ref() == Some(group))
    }

    /// Whether the id names a group, either declared or referenced by a column.
    #[must_use]
    pub fn is_group(&self, id: &EntityId) -> bool {
        self.group(id).is_some() || self.columns.iter().any(|c| c.group.as_ref() == Some(id))
    }

    // --- Cells ---

    /// All cells in record order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn cell(&self, key: &CellKey) -> Option<&Cell> {
        self.by_key.get(key).map(|&i| &self.cells[i])
    }

    /// Set a cell's state. Returns false if no cell exists at `key`.
    pub fn set_selected(&mut self, key: &CellKey, selected: bool) -> bool {
        let Some(&slot) = self.by_key.get(key) else {
            return false;
        };
        self.cells[slot].selected = selected;
        true
    }

    /// Whether any dataset is keyed under the row.
    #[must_use]
    pub fn has_row_cells(&self, row: &EntityId) -> bool {
        self.by_row.contains_key(row)
    }

    /// Keys of every cell in a row, in record order.
    #[must_use]
    pub fn row_keys(&self, row: &EntityId) -> Vec<CellKey> {
        self.by_row
            .get(row)
            .map(|slots| slots.iter().map(|&i| self.cells[i].key()).collect())
            .unwrap_or_default()
    }

    /// Keys of every cell in a column across the displayed rows, in row order.
    #[must_use]
    pub fn column_keys(&self, column: &EntityId) -> Vec<CellKey> {
        self.rows()
            .map(|row| CellKey { row: row.id.clone(), column: column.clone() })
            .filter(|key| self.by_key.contains_key(key))
            .collect()
    }

    /// Keys of every cell in a group's columns across the displayed rows.
    #[must_use]
    pub fn group_keys(&self, group: &EntityId) -> Vec<CellKey> {
        let columns: Vec<&EntityId> = self.columns_in_group(group).map(|c| &c.id).collect();
        self.rows()
            .flat_map(|row| {
                columns
                    .iter()
                    .map(move |&column| CellKey { row: row.id.clone(), column: column.clone() })
            })
            .filter(|key| self.by_key.contains_key(key))
            .collect()
    }

    /// Keys of every cell in record order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<CellKey> {
        self.cells.iter().map(Cell::key).collect()
    }

    /// Keys of the cells that are currently selected, in record order.
    #[must_use]
    pub fn selected_keys(&self) -> Vec<CellKey> {
        self.cells.iter().filter(|c| c.selected).map(Cell::key).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid holds no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // --- Ordering ---

    pub fn sort_rows(&mut self, spec: SortSpec) {
        self.row_order = sorted_order(&self.rows, spec);
    }

    pub fn sort_columns(&mut self, spec: SortSpec) {
        self.column_order = sorted_order(&self.columns, spec);
    }
}

fn key_field(record: &Value, field: &str, index: usize) -> Result<EntityId, GridError> {
    record
        .get(field)
        .and_then(EntityId::from_json)
        .ok_or_else(|| GridError::MissingKey { index, field: field.to_string() })
}

fn lookup<E: Entity>(entities: &[E]) -> HashMap<EntityId, usize> {
    let mut map = HashMap::with_capacity(entities.len());
    for (i, entity) in entities.iter().enumerate() {
        map.entry(entity.id().clone()).or_insert(i);
    }
    map
}

fn sorted_order<E: Entity>(entities: &[E], spec: SortSpec) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entities.len()).collect();
    let compare: fn(&E, &E) -> Ordering = match spec.key {
        SortKey::Input => {
            if spec.descending {
                order.reverse();
            }
            return order;
        }
        SortKey::Id => |a, b| a.id().natural_cmp(b.id()),
        SortKey::Name => |a, b| sort_name(a).cmp(sort_name(b)),
        SortKey::Label => |a, b| a.display_label().cmp(b.display_label()),
    };
    // Equal keys keep input order in both directions.
    order.sort_by(|&a, &b| {
        let ordering = compare(&entities[a], &entities[b]);
        if spec.descending { ordering.reverse() } else { ordering }
    });
    order
}

fn sort_name<E: Entity>(entity: &E) -> &str {
    entity.name().unwrap_or_else(|| entity.id().as_str())
}
