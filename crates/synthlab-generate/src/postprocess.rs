use tracing::warn;

use synthlab_core::{Column, ColumnData, ColumnInfo, ColumnKind, Error, Schema, Table};

/// Conform a generated table to a schema's declared constraints.
///
/// Integer columns are rounded then clipped, float columns clipped, categorical
/// columns rendered as text. Values outside the declared categories pass
/// through unchanged. Row count and column order never change. With
/// `apply_constraints` off the table is returned as is.
pub fn apply_constraints(
    schema: &Schema,
    table: Table,
    apply_constraints: bool,
) -> Result<Table, Error> {
    if !apply_constraints {
        return Ok(table);
    }
    if schema.len() != table.column_count() {
        return Err(Error::ColumnCountMismatch {
            expected: schema.len(),
            found: table.column_count(),
        });
    }

    let columns = schema
        .columns
        .iter()
        .zip(table.into_columns())
        .map(|(info, column)| conform_column(info, column))
        .collect();
    Table::new(columns)
}

fn conform_column(info: &ColumnInfo, column: Column) -> Column {
    let Column { name, data } = column;
    let data = match (info.kind, data) {
        (ColumnKind::Integer, ColumnData::Numeric(values)) => ColumnData::Numeric(
            values
                .into_iter()
                .map(|value| value.map(|v| clip(v.round(), info)))
                .collect(),
        ),
        (ColumnKind::Float, ColumnData::Numeric(values)) => ColumnData::Numeric(
            values
                .into_iter()
                .map(|value| value.map(|v| clip(v, info)))
                .collect(),
        ),
        (ColumnKind::Categorical, data) => data.into_categorical(),
        (ColumnKind::Identifier, data) => data,
        (kind, data) => {
            warn!(column = %name, kind = %kind, "numeric column holds text; left unchanged");
            data
        }
    };
    Column { name, data }
}

fn clip(value: f64, info: &ColumnInfo) -> f64 {
    let value = match info.min {
        Some(min) if value < min => min,
        _ => value,
    };
    match info.max {
        Some(max) if value > max => max,
        _ => value,
    }
}
