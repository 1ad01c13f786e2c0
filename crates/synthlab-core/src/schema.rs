use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::ColumnKind;

/// Metadata for a single column of a tabular dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    /// Inclusive lower bound for numeric and numeric identifier columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric and numeric identifier columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Sorted category labels for categorical columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Fraction of null cells observed at inference time.
    #[serde(default)]
    pub missing_rate: f64,
    #[serde(default)]
    pub is_identifier: bool,
    /// First value of a sequential identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// Declared fraction of nulls to emit during rule-based generation.
    #[serde(default)]
    pub null_rate: f64,
}

impl ColumnInfo {
    pub fn integer(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::numeric(name, ColumnKind::Integer, min, max)
    }

    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::numeric(name, ColumnKind::Float, min, max)
    }

    pub fn categorical<I, S>(name: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        categories.sort();
        categories.dedup();
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
            min: None,
            max: None,
            categories,
            missing_rate: 0.0,
            is_identifier: false,
            start: None,
            null_rate: 0.0,
        }
    }

    pub fn identifier(name: impl Into<String>, start: i64) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Identifier,
            min: None,
            max: None,
            categories: Vec::new(),
            missing_rate: 0.0,
            is_identifier: true,
            start: Some(start),
            null_rate: 0.0,
        }
    }

    fn numeric(name: impl Into<String>, kind: ColumnKind, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            min: Some(min),
            max: Some(max),
            categories: Vec::new(),
            missing_rate: 0.0,
            is_identifier: false,
            start: None,
            null_rate: 0.0,
        }
    }

    pub fn with_missing_rate(mut self, missing_rate: f64) -> Self {
        self.missing_rate = missing_rate;
        self
    }

    pub fn with_null_rate(mut self, null_rate: f64) -> Self {
        self.null_rate = null_rate;
        self
    }

    pub fn has_missing(&self) -> bool {
        self.missing_rate > 0.0
    }

    pub fn is_numeric(&self) -> bool {
        !self.is_identifier && self.kind.is_numeric()
    }

    pub fn is_categorical(&self) -> bool {
        !self.is_identifier && self.kind == ColumnKind::Categorical
    }

    /// Starting value used when identifier values are (re)generated.
    pub fn identifier_start(&self) -> i64 {
        self.start
            .or_else(|| self.min.map(|value| value as i64))
            .unwrap_or(1)
    }
}

/// Ordered, immutable description of a tabular dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Schema {
    pub columns: Vec<ColumnInfo>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// Columns that take part in training and statistical comparison.
    pub fn trainable_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|col| !col.is_identifier)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|col| col.is_numeric())
    }

    pub fn categorical_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|col| col.is_categorical())
    }

    pub fn identifier_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|col| col.is_identifier)
    }

    /// Schema restricted to non-identifier columns, order preserved.
    pub fn trainable(&self) -> Schema {
        Schema::new(self.trainable_columns().cloned().collect())
    }
}
