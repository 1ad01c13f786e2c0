//! Declared schema definitions for rule-based generation.

pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, Result, SpecError, ValidationIssue, ValidationReport};
pub use model::{ColumnDefinition, DEFAULT_SEED, DeclaredType, SchemaDefinition};
pub use schema::definition_json_schema;
pub use validate::{
    ValidatedDefinition, ensure_valid, parse_definition, validate_definition,
    validate_definition_document, validate_definition_json,
};
