use synthlab_core::{Column, EngineConfig, Table};
use synthlab_eval::{EvaluateOptions, EvaluationEngine, SchemaValidity, evaluate_schema_consistency};
use synthlab_generate::{DataDrivenPipeline, GenerateOptions, MarginalSampler, generate_from_schema};
use synthlab_infer::InferOptions;
use synthlab_spec::{ColumnDefinition, SchemaDefinition};

fn definition() -> SchemaDefinition {
    SchemaDefinition::new(
        7,
        vec![
            ColumnDefinition::identifier("id", 1),
            ColumnDefinition::int("age", 18, 90).with_null_rate(0.1),
            ColumnDefinition::float("score", 0.0, 1.0),
            ColumnDefinition::categorical("tier", ["gold", "silver", "bronze"]),
        ],
    )
}

#[test]
fn generated_table_conforms_to_its_definition() {
    let definition = definition();
    let table = generate_from_schema(&definition, 500).expect("generate");
    let result = evaluate_schema_consistency(&definition, &table);

    assert_eq!(result.schema_validity, SchemaValidity::Pass);
    assert_eq!(result.type_consistency, "All columns match declared types");
    assert_eq!(result.range_violations, 0);
    assert_eq!(result.category_violations, 0);
    assert!(result.identifier_issues.is_none());
    assert_eq!(result.null_rate["id"], 0.0);
    assert!(result.null_rate["age"] > 0.0 && result.null_rate["age"] < 0.25);
}

#[test]
fn tampered_table_fails_consistency() {
    let definition = definition();
    let mut columns = generate_from_schema(&definition, 50)
        .expect("generate")
        .into_columns();
    columns[3] = Column::categorical("tier", vec![Some("platinum".to_string()); 50]);
    columns[0] = Column::numeric("id", (0..50).map(|i| Some(i as f64 * 2.0 + 1.0)).collect());
    let table = Table::new(columns).expect("table");

    let result = evaluate_schema_consistency(&definition, &table);
    assert_eq!(result.schema_validity, SchemaValidity::Fail);
    assert_eq!(result.category_violations, 50);
    assert!(
        result
            .identifier_issues
            .as_deref()
            .is_some_and(|issue| issue.contains("is not continuous"))
    );
}

#[test]
fn engine_reports_consistency_without_real_rows() {
    let definition = definition();
    let table = generate_from_schema(&definition, 100).expect("generate");
    let run = EvaluationEngine::new(EvaluateOptions::default())
        .run_schema_consistency(&definition, &table)
        .expect("run");

    assert!(run.metrics_path.is_none());
    assert!(run.metrics.rows.real.is_none());
    assert!(run.metrics.statistical.is_none());
    assert!(run.report.contains("PASS"));
}

#[test]
fn data_driven_output_evaluates_against_source() {
    let real = generate_from_schema(&definition(), 300).expect("real");
    let output = DataDrivenPipeline::new(
        MarginalSampler::new(11),
        InferOptions::default(),
        GenerateOptions::default(),
    )
    .run(&real, 300)
    .expect("pipeline");

    let mut config = EngineConfig::default();
    config.adversarial.n_estimators = 25;
    let run = EvaluationEngine::new(EvaluateOptions {
        config,
        out_dir: None,
    })
    .run_statistical(&real, &output.table, &output.schema)
    .expect("evaluate");

    let statistical = run.metrics.statistical.expect("statistical");
    assert!(statistical.column_tests().all(|test| test.column != "id"));
    assert!((0.0..=1.0).contains(&statistical.adversarial_auc));
    assert_eq!(run.metrics.rows.real, Some(300));
}
