use crate::index::EntityId;

/// Errors raised while loading or operating on a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two datasets share the same row/column pair.
    #[error("multiple data objects for the same row/column combination: row '{row}' col '{column}'")]
    DuplicateCell { row: EntityId, column: EntityId },
    /// A dataset lacks a string or number value for a key field.
    #[error("dataset #{index} has no usable `{field}` key")]
    MissingKey { index: usize, field: String },
    /// The row id is neither a row entity nor a key of any dataset.
    #[error("unknown row '{0}'")]
    UnknownRow(EntityId),
    /// The column id is not a column entity.
    #[error("unknown column '{0}'")]
    UnknownColumn(EntityId),
    /// The group id is neither a column group nor referenced by any column.
    #[error("unknown column group '{0}'")]
    UnknownGroup(EntityId),
    /// No dataset exists for the row/column pair.
    #[error("no dataset at row '{row}' col '{column}'")]
    UnknownCell { row: EntityId, column: EntityId },
    /// Host-supplied JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The rendering surface failed to draw.
    #[error("surface error: {0}")]
    Surface(String),
}

impl From<std::fmt::Error> for GridError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Surface(err.to_string())
    }
}
