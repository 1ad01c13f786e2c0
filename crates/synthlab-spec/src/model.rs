use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use synthlab_core::{ColumnInfo, ColumnKind, Schema};

use crate::errors::SpecError;

/// Seed used when a definition does not declare one.
pub const DEFAULT_SEED: u64 = 42;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Declared column type in a schema definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    Int,
    Float,
    Categorical,
    Identifier,
}

impl DeclaredType {
    pub fn kind(self) -> ColumnKind {
        match self {
            DeclaredType::Int => ColumnKind::Integer,
            DeclaredType::Float => ColumnKind::Float,
            DeclaredType::Categorical => ColumnKind::Categorical,
            DeclaredType::Identifier => ColumnKind::Identifier,
        }
    }

    pub fn from_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Integer => DeclaredType::Int,
            ColumnKind::Float => DeclaredType::Float,
            ColumnKind::Categorical => DeclaredType::Categorical,
            ColumnKind::Identifier => DeclaredType::Identifier,
        }
    }
}

/// Column declaration with generation hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: DeclaredType,
    /// Inclusive lower bound (int/float).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound (int/float).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values, sampled uniformly (categorical).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// First identifier value; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    /// Fraction of generated cells replaced by nulls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_rate: Option<f64>,
}

impl ColumnDefinition {
    pub fn int(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self::bounded(name, DeclaredType::Int, min as f64, max as f64)
    }

    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::bounded(name, DeclaredType::Float, min, max)
    }

    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            column_type: DeclaredType::Categorical,
            min: None,
            max: None,
            values: values.into_iter().map(Into::into).collect(),
            start: None,
            null_rate: None,
        }
    }

    pub fn identifier(name: impl Into<String>, start: i64) -> Self {
        Self {
            name: name.into(),
            column_type: DeclaredType::Identifier,
            min: None,
            max: None,
            values: Vec::new(),
            start: Some(start),
            null_rate: None,
        }
    }

    fn bounded(name: impl Into<String>, column_type: DeclaredType, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            column_type,
            min: Some(min),
            max: Some(max),
            values: Vec::new(),
            start: None,
            null_rate: None,
        }
    }

    pub fn with_null_rate(mut self, rate: f64) -> Self {
        self.null_rate = Some(rate);
        self
    }

    pub fn start_or_default(&self) -> i64 {
        self.start.unwrap_or(1)
    }

    pub fn null_rate_or_default(&self) -> f64 {
        self.null_rate.unwrap_or(0.0)
    }

    /// Integer bounds after rounding inward (`ceil(min)`, `floor(max)`).
    pub fn int_bounds(&self) -> Option<(i64, i64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min.ceil() as i64, max.floor() as i64)),
            _ => None,
        }
    }
}

/// User-declared schema used for rule-based generation and consistency checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDefinition {
    /// Seed for the deterministic generation stream.
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub columns: Vec<ColumnDefinition>,
}

impl SchemaDefinition {
    pub fn new(seed: u64, columns: Vec<ColumnDefinition>) -> Self {
        Self { seed, columns }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Convert into the engine's column schema.
    pub fn to_schema(&self) -> Schema {
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let info = match col.column_type {
                    DeclaredType::Int => ColumnInfo::integer(
                        &col.name,
                        col.min.unwrap_or_default(),
                        col.max.unwrap_or_default(),
                    ),
                    DeclaredType::Float => ColumnInfo::float(
                        &col.name,
                        col.min.unwrap_or_default(),
                        col.max.unwrap_or_default(),
                    ),
                    DeclaredType::Categorical => {
                        ColumnInfo::categorical(&col.name, col.values.iter().cloned())
                    }
                    DeclaredType::Identifier => {
                        ColumnInfo::identifier(&col.name, col.start_or_default())
                    }
                };
                info.with_null_rate(col.null_rate_or_default())
            })
            .collect();
        Schema::new(columns)
    }

    /// Build a definition that replays an inferred schema in schema mode.
    ///
    /// Observed missing rates become declared null rates.
    pub fn from_schema(schema: &Schema, seed: u64) -> Result<Self, SpecError> {
        let mut columns = Vec::with_capacity(schema.columns.len());
        for info in &schema.columns {
            let declared = DeclaredType::from_kind(info.kind);
            let column = match declared {
                DeclaredType::Int | DeclaredType::Float => {
                    let (Some(min), Some(max)) = (info.min, info.max) else {
                        return Err(SpecError::Conversion(format!(
                            "column '{}' has no observed bounds",
                            info.name
                        )));
                    };
                    ColumnDefinition::bounded(&info.name, declared, min, max)
                }
                DeclaredType::Categorical => {
                    if info.categories.is_empty() {
                        return Err(SpecError::Conversion(format!(
                            "column '{}' has no observed categories",
                            info.name
                        )));
                    }
                    ColumnDefinition::categorical(&info.name, info.categories.iter().cloned())
                }
                DeclaredType::Identifier => {
                    ColumnDefinition::identifier(&info.name, info.identifier_start())
                }
            };
            let column = if info.missing_rate > 0.0 && declared != DeclaredType::Identifier {
                column.with_null_rate(info.missing_rate)
            } else {
                column
            };
            columns.push(column);
        }
        Ok(Self { seed, columns })
    }
}
