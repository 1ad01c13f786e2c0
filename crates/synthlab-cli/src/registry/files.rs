use std::fs::{OpenOptions, create_dir_all};
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use synthlab_core::{Schema, validate_schema};
use synthlab_spec::{SchemaDefinition, definition_json_schema, validate_definition_document};

use super::{RegistryError, RegistryResult};

/// Load a declared schema document, validating it structurally and semantically.
///
/// Warnings are logged; errors fail with every issue in the message.
pub fn read_definition(path: &Path) -> RegistryResult<SchemaDefinition> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let json_schema = serde_json::to_value(definition_json_schema())?;

    let validated = validate_definition_document(&value, &json_schema)
        .map_err(|report| RegistryError::Definition(report.error_summary()))?;
    for issue in &validated.warnings {
        warn!(path = %issue.path, code = %issue.code, "{}", issue.message);
    }
    Ok(validated.definition)
}

/// Load an inferred `Schema` written by `synthlab infer`.
pub fn read_schema(path: &Path) -> RegistryResult<Schema> {
    let content = std::fs::read_to_string(path)?;
    let schema: Schema = serde_json::from_str(&content)?;
    validate_schema(&schema).map_err(|err| RegistryError::Definition(err.to_string()))?;
    Ok(schema)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}
