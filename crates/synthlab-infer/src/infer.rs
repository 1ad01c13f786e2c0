use tracing::{debug, info};

use synthlab_core::{Error, Result, Schema, Table};

use crate::mapper::map_column;
use crate::options::InferOptions;
use crate::profile::ColumnProfile;

/// Infer a schema with default options.
pub fn infer_schema(table: &Table) -> Result<Schema> {
    infer_schema_with_options(table, &InferOptions::default())
}

/// Infer a schema using only a categorical threshold.
pub fn infer_schema_with_threshold(table: &Table, categorical_threshold: usize) -> Result<Schema> {
    let opts = InferOptions::default().with_threshold(categorical_threshold);
    infer_schema_with_options(table, &opts)
}

/// Infer a column schema from a materialized table.
///
/// Fails with [`Error::EmptyDataset`] when the table has no columns or no rows.
pub fn infer_schema_with_options(table: &Table, opts: &InferOptions) -> Result<Schema> {
    if table.column_count() == 0 {
        return Err(Error::EmptyDataset("table has no columns".to_string()));
    }
    if table.row_count() == 0 {
        return Err(Error::EmptyDataset("table has no rows".to_string()));
    }

    let mut columns = Vec::with_capacity(table.column_count());
    for column in table.columns() {
        let profile = ColumnProfile::observe(&column.data);
        let info = map_column(&column.name, &profile, opts);
        debug!(
            column = %column.name,
            kind = %info.kind,
            distinct = profile.distinct.len(),
            missing_rate = info.missing_rate,
            "column inferred"
        );
        columns.push(info);
    }

    let schema = Schema::new(columns);
    info!(
        columns = schema.len(),
        rows = table.row_count(),
        identifiers = schema.identifier_columns().count(),
        threshold = opts.categorical_threshold,
        "schema inferred"
    );
    Ok(schema)
}
