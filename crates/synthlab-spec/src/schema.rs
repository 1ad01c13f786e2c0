use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::SchemaDefinition;

/// Emit the JSON Schema for a schema definition document.
pub fn definition_json_schema() -> RootSchema {
    schema_for!(SchemaDefinition)
}
