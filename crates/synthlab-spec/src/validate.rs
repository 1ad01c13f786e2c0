use std::collections::BTreeSet;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::errors::{SpecError, ValidationIssue, ValidationReport};
use crate::model::{ColumnDefinition, DeclaredType, SchemaDefinition};

/// Validated definition with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedDefinition {
    pub definition: SchemaDefinition,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a definition JSON document against the definition JSON Schema.
pub fn validate_definition_json(
    definition_json: &Value,
    json_schema: &Value,
) -> Result<ValidationReport, SpecError> {
    let compiled =
        JSONSchema::compile(json_schema).map_err(|err| SpecError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();
    if let Err(errors) = compiled.validate(definition_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(ValidationIssue::error(
                "schema_violation",
                path,
                error.to_string(),
            ));
        }
    }
    Ok(report)
}

/// Semantic checks on a parsed definition.
pub fn validate_definition(definition: &SchemaDefinition) -> ValidationReport {
    let mut report = ValidationReport::default();

    if definition.columns.is_empty() {
        report.push(
            ValidationIssue::error("no_columns", "/columns", "definition declares no columns")
                .with_hint("declare at least one column"),
        );
    }

    let mut seen = BTreeSet::new();
    for (idx, column) in definition.columns.iter().enumerate() {
        let path = format!("/columns/{idx}");
        if column.name.trim().is_empty() {
            report.push(ValidationIssue::error(
                "empty_column_name",
                format!("{path}/name"),
                "column name must not be empty",
            ));
        } else if !seen.insert(column.name.as_str()) {
            report.push(ValidationIssue::error(
                "duplicate_column",
                format!("{path}/name"),
                format!("duplicate column '{}'", column.name),
            ));
        }
        validate_column(column, &path, &mut report);
    }

    report
}

fn validate_column(column: &ColumnDefinition, path: &str, report: &mut ValidationReport) {
    match column.column_type {
        DeclaredType::Int | DeclaredType::Float => validate_bounds(column, path, report),
        DeclaredType::Categorical => {
            if column.values.is_empty() {
                report.push(
                    ValidationIssue::error(
                        "empty_values",
                        format!("{path}/values"),
                        format!("categorical column '{}' has no values", column.name),
                    )
                    .with_hint("list at least one allowed value"),
                );
            }
            if column.min.is_some() || column.max.is_some() {
                report.push(ValidationIssue::warning(
                    "bounds_ignored",
                    path,
                    format!("min/max are ignored for categorical column '{}'", column.name),
                ));
            }
        }
        DeclaredType::Identifier => {
            if column.start.is_none() {
                report.push(ValidationIssue::warning(
                    "default_start",
                    format!("{path}/start"),
                    format!("identifier column '{}' starts at 1", column.name),
                ));
            }
            if column.null_rate_or_default() > 0.0 {
                report.push(ValidationIssue::error(
                    "identifier_nulls",
                    format!("{path}/null_rate"),
                    format!("identifier column '{}' cannot contain nulls", column.name),
                ));
            }
        }
    }

    if let Some(rate) = column.null_rate
        && !(0.0..=1.0).contains(&rate)
    {
        report.push(ValidationIssue::error(
            "invalid_null_rate",
            format!("{path}/null_rate"),
            format!("null_rate {rate} for '{}' is outside [0, 1]", column.name),
        ));
    }
}

fn validate_bounds(column: &ColumnDefinition, path: &str, report: &mut ValidationReport) {
    let (Some(min), Some(max)) = (column.min, column.max) else {
        report.push(
            ValidationIssue::error(
                "missing_bounds",
                path,
                format!("numeric column '{}' requires min and max", column.name),
            )
            .with_hint("add both min and max"),
        );
        return;
    };

    if !min.is_finite() || !max.is_finite() {
        report.push(ValidationIssue::error(
            "non_finite_bounds",
            path,
            format!("bounds of '{}' must be finite", column.name),
        ));
        return;
    }

    if min > max {
        report.push(ValidationIssue::error(
            "min_gt_max",
            format!("{path}/min"),
            format!("min {min} is greater than max {max} for '{}'", column.name),
        ));
        return;
    }

    if !(max - min).is_finite() {
        report.push(
            ValidationIssue::error(
                "non_finite_range",
                path,
                format!("range [{min}, {max}] of '{}' is too wide to sample", column.name),
            )
            .with_hint("narrow the bounds so that max - min is finite"),
        );
        return;
    }

    if column.column_type == DeclaredType::Int
        && let Some((lo, hi)) = column.int_bounds()
        && lo > hi
    {
        report.push(ValidationIssue::error(
            "empty_int_range",
            path,
            format!("[{min}, {max}] contains no integer for '{}'", column.name),
        ));
    }
}

/// Parse a definition document from raw JSON text.
pub fn parse_definition(text: &str) -> Result<SchemaDefinition, SpecError> {
    Ok(serde_json::from_str(text)?)
}

/// Validate the definition end-to-end, returning structured issues on failure.
pub fn validate_definition_document(
    definition_json: &Value,
    json_schema: &Value,
) -> Result<ValidatedDefinition, ValidationReport> {
    let structural = match validate_definition_json(definition_json, json_schema) {
        Ok(report) => report,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationIssue::error(
                "schema_validation_error",
                "/",
                err.to_string(),
            ));
            return Err(report);
        }
    };
    if !structural.is_ok() {
        return Err(structural);
    }

    let definition: SchemaDefinition = match serde_json::from_value(definition_json.clone()) {
        Ok(definition) => definition,
        Err(err) => {
            let mut report = ValidationReport::default();
            report.push(ValidationIssue::error(
                "invalid_definition_json",
                "/",
                err.to_string(),
            ));
            return Err(report);
        }
    };

    let semantic = validate_definition(&definition);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedDefinition {
        definition,
        warnings: semantic.warnings,
    })
}

/// Check a definition and turn errors into `SpecError::Invalid`.
pub fn ensure_valid(definition: &SchemaDefinition) -> Result<Vec<ValidationIssue>, SpecError> {
    let report = validate_definition(definition);
    if report.is_ok() {
        Ok(report.warnings)
    } else {
        Err(SpecError::Invalid(report))
    }
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
