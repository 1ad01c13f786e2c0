//! Core contracts and helpers for synthlab.
//!
//! This crate defines the typed table representation, the column schema
//! contract, engine configuration and the error type shared by the inference,
//! generation and evaluation crates.

pub mod config;
pub mod error;
pub mod schema;
pub mod table;
pub mod types;
pub mod validation;

pub use config::{
    AdversarialConfig, CorrelationThresholds, DEFAULT_CATEGORICAL_THRESHOLD, EngineConfig,
    InferConfig,
};
pub use error::{Error, Result};
pub use schema::{ColumnInfo, Schema};
pub use table::{Column, ColumnData, NULL_TOKENS, Table};
pub use types::{ColumnKind, format_number};
pub use validation::validate_schema;
