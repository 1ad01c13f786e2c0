use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::types::ColumnKind;

/// Validate internal consistency of a tabular schema.
///
/// This checks:
/// - column names are unique
/// - kind and identifier flag agree
/// - numeric bounds are ordered and finite
/// - rates lie in `[0, 1]`
pub fn validate_schema(schema: &Schema) -> Result<()> {
    let mut names = BTreeSet::new();

    for column in &schema.columns {
        if column.name.is_empty() {
            return Err(Error::InvalidSchema("column name must not be empty".to_string()));
        }
        if !names.insert(column.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate column name: {}",
                column.name
            )));
        }

        if column.is_identifier != (column.kind == ColumnKind::Identifier) {
            return Err(Error::InvalidSchema(format!(
                "column '{}': identifier flag disagrees with kind '{}'",
                column.name, column.kind
            )));
        }

        if let (Some(min), Some(max)) = (column.min, column.max) {
            if !min.is_finite() || !max.is_finite() {
                return Err(Error::InvalidSchema(format!(
                    "column '{}': bounds must be finite",
                    column.name
                )));
            }
            if min > max {
                return Err(Error::InvalidSchema(format!(
                    "column '{}': min ({min}) must be <= max ({max})",
                    column.name
                )));
            }
        }

        for (label, rate) in [("missing_rate", column.missing_rate), ("null_rate", column.null_rate)]
        {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::InvalidSchema(format!(
                    "column '{}': {label} must be between 0 and 1",
                    column.name
                )));
            }
        }
    }

    Ok(())
}
