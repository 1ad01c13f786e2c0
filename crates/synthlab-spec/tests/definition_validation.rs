use serde_json::{Value, json};
use synthlab_core::ColumnKind;
use synthlab_spec::{
    ColumnDefinition, DeclaredType, SchemaDefinition, SpecError, definition_json_schema,
    ensure_valid, validate_definition, validate_definition_document,
};

fn json_schema() -> Value {
    serde_json::to_value(definition_json_schema()).expect("schema to json")
}

fn codes(report: &synthlab_spec::ValidationReport) -> Vec<&str> {
    report.errors.iter().map(|issue| issue.code.as_str()).collect()
}

#[test]
fn accepts_well_formed_document() {
    let doc = json!({
        "seed": 7,
        "columns": [
            {"name": "id", "type": "identifier", "start": 100},
            {"name": "age", "type": "int", "min": 18, "max": 90},
            {"name": "score", "type": "float", "min": 0.0, "max": 1.0, "null_rate": 0.1},
            {"name": "city", "type": "categorical", "values": ["SP", "RJ"]}
        ]
    });

    let validated = validate_definition_document(&doc, &json_schema()).expect("valid");
    assert_eq!(validated.definition.seed, 7);
    assert_eq!(validated.definition.columns.len(), 4);
    assert!(validated.warnings.is_empty());
}

#[test]
fn seed_defaults_to_42() {
    let doc = json!({"columns": [{"name": "a", "type": "int", "min": 0, "max": 1}]});
    let validated = validate_definition_document(&doc, &json_schema()).expect("valid");
    assert_eq!(validated.definition.seed, 42);
}

#[test]
fn rejects_unknown_type_structurally() {
    let doc = json!({"columns": [{"name": "a", "type": "date"}]});
    let report = validate_definition_document(&doc, &json_schema()).expect_err("invalid");
    assert!(codes(&report).contains(&"schema_violation"));
}

#[test]
fn rejects_min_greater_than_max() {
    let definition = SchemaDefinition::new(1, vec![ColumnDefinition::int("age", 10, 5)]);
    let report = validate_definition(&definition);
    assert_eq!(codes(&report), vec!["min_gt_max"]);
    assert_eq!(report.errors[0].path, "/columns/0/min");
}

#[test]
fn rejects_range_too_wide_to_sample() {
    let doc = json!({"columns": [{"name": "x", "type": "float", "min": -1e308, "max": 1e308}]});
    let report = validate_definition_document(&doc, &json_schema()).expect_err("invalid");
    assert_eq!(codes(&report), vec!["non_finite_range"]);
    assert_eq!(report.errors[0].path, "/columns/0");
}

#[test]
fn rejects_empty_values_and_bad_null_rate() {
    let definition = SchemaDefinition::new(
        1,
        vec![
            ColumnDefinition::categorical("city", Vec::<String>::new()),
            ColumnDefinition::float("x", 0.0, 1.0).with_null_rate(1.5),
        ],
    );
    let report = validate_definition(&definition);
    assert_eq!(codes(&report), vec!["empty_values", "invalid_null_rate"]);
}

#[test]
fn rejects_duplicate_names_and_missing_bounds() {
    let mut missing = ColumnDefinition::float("x", 0.0, 1.0);
    missing.max = None;
    let definition = SchemaDefinition::new(
        1,
        vec![ColumnDefinition::int("x", 0, 1), missing],
    );
    let report = validate_definition(&definition);
    assert_eq!(codes(&report), vec!["duplicate_column", "missing_bounds"]);
}

#[test]
fn rejects_int_range_without_integers() {
    let mut column = ColumnDefinition::int("x", 0, 0);
    column.min = Some(1.2);
    column.max = Some(1.8);
    let err = ensure_valid(&SchemaDefinition::new(1, vec![column])).expect_err("invalid");
    match err {
        SpecError::Invalid(report) => assert_eq!(codes(&report), vec!["empty_int_range"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn identifier_without_start_warns() {
    let mut column = ColumnDefinition::identifier("id", 1);
    column.start = None;
    let warnings = ensure_valid(&SchemaDefinition::new(1, vec![column])).expect("valid");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, "default_start");
}

#[test]
fn converts_to_core_schema() {
    let definition = SchemaDefinition::new(
        3,
        vec![
            ColumnDefinition::identifier("id", 5),
            ColumnDefinition::categorical("city", ["RJ", "SP"]).with_null_rate(0.2),
        ],
    );
    let schema = definition.to_schema();
    assert_eq!(schema.columns[0].kind, ColumnKind::Identifier);
    assert_eq!(schema.columns[0].identifier_start(), 5);
    assert_eq!(schema.columns[1].categories, vec!["RJ", "SP"]);
    assert_eq!(schema.columns[1].null_rate, 0.2);

    let back = SchemaDefinition::from_schema(&schema, 3).expect("convert back");
    assert_eq!(back.columns[0].column_type, DeclaredType::Identifier);
    assert_eq!(back.columns[0].start, Some(5));
    assert_eq!(back.columns[1].values, vec!["RJ", "SP"]);
}
