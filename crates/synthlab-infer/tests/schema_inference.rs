use synthlab_core::{Column, ColumnKind, Error, Table};
use synthlab_infer::{
    InferOptions, infer_schema, infer_schema_with_options, infer_schema_with_threshold,
};

fn numeric(name: &str, values: &[f64]) -> Column {
    Column::numeric(name, values.iter().copied().map(Some).collect())
}

fn text(name: &str, values: &[&str]) -> Column {
    Column::categorical(name, values.iter().map(|v| Some(v.to_string())).collect())
}

#[test]
fn few_distinct_numbers_become_categorical() {
    let age = numeric(
        "age",
        &[18.0, 18.0, 19.0, 20.0, 90.0, 90.0, 90.0, 90.0, 90.0, 90.0],
    );
    let table = Table::new(vec![age]).expect("table");

    let schema = infer_schema(&table).expect("infer");
    let info = &schema.columns[0];
    assert_eq!(info.kind, ColumnKind::Categorical);
    assert_eq!(info.categories, vec!["18", "19", "20", "90"]);
    assert!(!info.is_identifier);
}

#[test]
fn text_columns_are_categorical_with_sorted_categories() {
    let table = Table::new(vec![text("city", &["SP", "RJ", "BH", "RJ"])]).expect("table");
    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Categorical);
    assert_eq!(schema.columns[0].categories, vec!["BH", "RJ", "SP"]);
}

#[test]
fn many_whole_numbers_become_integer() {
    let values: Vec<f64> = (0..40).map(|i| (i % 20) as f64 + 100.0).collect();
    let table = Table::new(vec![numeric("score", &values)]).expect("table");

    let schema = infer_schema(&table).expect("infer");
    let info = &schema.columns[0];
    assert_eq!(info.kind, ColumnKind::Integer);
    assert_eq!(info.min, Some(100.0));
    assert_eq!(info.max, Some(119.0));
}

#[test]
fn fractional_values_become_float() {
    let values: Vec<f64> = (0..30).map(|i| (i % 15) as f64 * 0.5).collect();
    let table = Table::new(vec![numeric("ratio", &values)]).expect("table");
    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Float);
    assert_eq!(schema.columns[0].max, Some(7.0));
}

#[test]
fn threshold_is_configurable() {
    let values: Vec<f64> = (0..40).map(|i| (i % 20) as f64).collect();
    let table = Table::new(vec![numeric("x", &values)]).expect("table");
    let schema = infer_schema_with_threshold(&table, 25).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Categorical);
    assert_eq!(schema.columns[0].categories.len(), 20);
}

#[test]
fn records_missing_rate_and_ignores_nulls() {
    let mut values: Vec<Option<f64>> = (0..15).map(|i| Some((i * 2) as f64)).collect();
    values.extend([None, None, None, None, None]);
    let table = Table::new(vec![Column::numeric("x", values)]).expect("table");

    let schema = infer_schema_with_options(
        &table,
        &InferOptions::default().with_identifier_override("x", false),
    )
    .expect("infer");
    let info = &schema.columns[0];
    assert_eq!(info.kind, ColumnKind::Integer);
    assert!((info.missing_rate - 0.25).abs() < 1e-12);
    assert_eq!(info.max, Some(28.0));
}

#[test]
fn all_null_column_is_categorical_without_categories() {
    let table = Table::new(vec![
        Column::categorical("empty", vec![None, None, None]),
        numeric("x", &[1.0, 2.0, 3.0]),
    ])
    .expect("table");
    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Categorical);
    assert!(schema.columns[0].categories.is_empty());
    assert_eq!(schema.columns[0].missing_rate, 1.0);
}

#[test]
fn numeric_text_cells_are_treated_as_numbers() {
    let values: Vec<String> = (0..12).map(|i| format!("{}.5", i)).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let table = Table::new(vec![text("amount", &refs)]).expect("table");
    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Float);
    assert_eq!(schema.columns[0].min, Some(0.5));
}

#[test]
fn sequential_keys_are_flagged_as_identifiers() {
    let ids: Vec<f64> = (1..=50).map(|i| i as f64).collect();
    let codes: Vec<String> = (0..50).map(|i| format!("C-{i:04}")).collect();
    let code_refs: Vec<&str> = codes.iter().map(String::as_str).collect();
    let table = Table::new(vec![numeric("id", &ids), text("code", &code_refs)]).expect("table");

    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Identifier);
    assert!(schema.columns[0].is_identifier);
    assert_eq!(schema.columns[0].start, Some(1));
    assert_eq!(schema.columns[0].max, Some(50.0));
    assert_eq!(schema.columns[1].kind, ColumnKind::Identifier);
    assert_eq!(schema.columns[1].start, None);
    assert_eq!(schema.trainable_columns().count(), 0);
}

#[test]
fn overrides_replace_the_identifier_heuristic() {
    let ids: Vec<f64> = (1..=50).map(|i| i as f64).collect();
    let repeated: Vec<f64> = (0..50).map(|i| (i % 25) as f64).collect();
    let table = Table::new(vec![numeric("id", &ids), numeric("bucket", &repeated)]).expect("table");

    let opts = InferOptions::default()
        .with_identifier_override("id", false)
        .with_identifier_override("bucket", true);
    let schema = infer_schema_with_options(&table, &opts).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Integer);
    assert_eq!(schema.columns[1].kind, ColumnKind::Identifier);
    assert_eq!(schema.columns[1].start, Some(0));
}

#[test]
fn detection_can_be_disabled() {
    let ids: Vec<f64> = (1..=50).map(|i| i as f64).collect();
    let table = Table::new(vec![numeric("id", &ids)]).expect("table");
    let opts = InferOptions {
        detect_identifiers: false,
        ..InferOptions::default()
    };
    let schema = infer_schema_with_options(&table, &opts).expect("infer");
    assert_eq!(schema.columns[0].kind, ColumnKind::Integer);
}

#[test]
fn empty_tables_are_rejected() {
    let no_columns = Table::new(Vec::new()).expect("table");
    assert!(matches!(
        infer_schema(&no_columns),
        Err(Error::EmptyDataset(_))
    ));

    let no_rows = Table::new(vec![numeric("x", &[])]).expect("table");
    let err = infer_schema(&no_rows).expect_err("empty");
    assert!(err.is_input_error());
}

#[test]
fn preserves_column_order() {
    let table = Table::new(vec![
        text("b", &["x", "y"]),
        numeric("a", &[1.0, 2.0]),
        text("c", &["z", "z"]),
    ])
    .expect("table");
    let schema = infer_schema(&table).expect("infer");
    assert_eq!(schema.names(), vec!["b", "a", "c"]);
}

#[test]
fn options_load_from_partial_json() {
    let opts: InferOptions = serde_json::from_str(
        r#"{"categorical_threshold": 3, "identifier_overrides": {"code": true}}"#,
    )
    .expect("options");
    assert_eq!(opts.categorical_threshold, 3);
    assert!(opts.detect_identifiers);

    let codes: Vec<f64> = (0..20).map(|i| (i % 4) as f64).collect();
    let table = Table::new(vec![numeric("code", &codes)]).expect("table");
    let schema = infer_schema_with_options(&table, &opts).expect("infer");
    let json = serde_json::to_value(&schema).expect("json");
    assert_eq!(json["columns"][0]["kind"], "identifier");
}
