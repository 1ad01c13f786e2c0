use thiserror::Error;

/// Core error type shared across synthlab crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The input table has no columns or no rows.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),
    /// Schema and table disagree on the number of columns.
    #[error("column count mismatch: schema has {expected} column(s), table has {found}")]
    ColumnCountMismatch { expected: usize, found: usize },
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// The table violates internal invariants (ragged columns, duplicate names).
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

impl Error {
    /// True for errors caused by caller input rather than data shortage.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyDataset(_)
                | Error::ColumnCountMismatch { .. }
                | Error::InvalidSchema(_)
                | Error::InvalidTable(_)
        )
    }
}

/// Convenience alias for results returned by synthlab crates.
pub type Result<T> = std::result::Result<T, Error>;
