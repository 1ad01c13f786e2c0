use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::format_number;

/// Text cells treated as missing when typing raw records.
pub const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Typed values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(values) => values.get(row).is_none_or(|v| v.is_none()),
            ColumnData::Categorical(values) => values.get(row).is_none_or(|v| v.is_none()),
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnData::Numeric(_) => None,
            ColumnData::Categorical(values) => Some(values),
        }
    }

    /// Non-null numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        match self {
            ColumnData::Numeric(values) => values.iter().flatten().copied().collect(),
            ColumnData::Categorical(values) => values
                .iter()
                .flatten()
                .filter_map(|value| value.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .collect(),
        }
    }

    /// Cell rendered as a label; numbers use [`format_number`].
    pub fn label(&self, row: usize) -> Option<String> {
        match self {
            ColumnData::Numeric(values) => values.get(row).copied().flatten().map(format_number),
            ColumnData::Categorical(values) => values.get(row).cloned().flatten(),
        }
    }

    /// Every cell rendered as an optional label.
    pub fn labels(&self) -> Vec<Option<String>> {
        (0..self.len()).map(|row| self.label(row)).collect()
    }

    /// Convert to a categorical column, rendering numbers as labels.
    pub fn into_categorical(self) -> ColumnData {
        match self {
            ColumnData::Numeric(values) => ColumnData::Categorical(
                values
                    .into_iter()
                    .map(|value| value.map(format_number))
                    .collect(),
            ),
            categorical => categorical,
        }
    }
}

/// Named column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Column-oriented table with ordered, equally sized, uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(Error::InvalidTable(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let rows = first.len();
            if let Some(ragged) = columns.iter().find(|col| col.len() != rows) {
                return Err(Error::InvalidTable(format!(
                    "column '{}' has {} row(s), expected {}",
                    ragged.name,
                    ragged.len(),
                    rows
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build a typed table from raw text records.
    ///
    /// A column is numeric iff every non-null cell parses as a finite number.
    pub fn from_string_records(headers: &[String], records: &[Vec<String>]) -> Result<Self> {
        let mut columns = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cells: Vec<Option<&str>> = records
                .iter()
                .map(|record| record.get(idx).map(|cell| cell.as_str()))
                .map(|cell| cell.filter(|value| !is_null_token(value)))
                .collect();

            let parsed: Option<Vec<Option<f64>>> = cells
                .iter()
                .map(|cell| match cell {
                    None => Some(None),
                    Some(value) => value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(Some),
                })
                .collect();

            let data = match parsed {
                Some(values) => ColumnData::Numeric(values),
                None => ColumnData::Categorical(
                    cells
                        .into_iter()
                        .map(|cell| cell.map(|value| value.to_string()))
                        .collect(),
                ),
            };
            columns.push(Column {
                name: header.clone(),
                data,
            });
        }
        Table::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Rows rendered as text cells, nulls as empty strings.
    pub fn to_string_records(&self) -> Vec<Vec<String>> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| col.data.label(row).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

fn is_null_token(value: &str) -> bool {
    NULL_TOKENS.contains(&value.trim())
}
