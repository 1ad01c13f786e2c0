use synthlab_core::{Column, ColumnKind, Table};
use synthlab_generate::{
    DataDrivenPipeline, FittedModel, GenerateOptions, GenerationError, MarginalSampler,
    TabularModel,
};
use synthlab_infer::InferOptions;

fn real_table() -> Table {
    let ids: Vec<Option<f64>> = (1..=60).map(|i| Some(i as f64)).collect();
    let income: Vec<Option<f64>> = (0..60)
        .map(|i| Some(30_000.5 + i as f64 * 1_487.25))
        .collect();
    let tenure: Vec<Option<f64>> = (0..60).map(|i| Some((i % 30) as f64)).collect();
    let plan: Vec<Option<String>> = (0..60)
        .map(|i| Some(["basic", "pro", "team"][i % 3].to_string()))
        .collect();
    Table::new(vec![
        Column::numeric("customer_id", ids),
        Column::numeric("income", income),
        Column::numeric("tenure", tenure),
        Column::categorical("plan", plan),
    ])
    .expect("table")
}

fn pipeline<M: TabularModel>(model: M) -> DataDrivenPipeline<M> {
    DataDrivenPipeline::new(model, InferOptions::default(), GenerateOptions::default())
}

#[test]
fn pipeline_produces_conforming_table() {
    let output = pipeline(MarginalSampler::new(7))
        .run(&real_table(), 120)
        .expect("pipeline");

    assert_eq!(output.table.row_count(), 120);
    assert_eq!(
        output.table.names(),
        vec!["customer_id", "income", "tenure", "plan"]
    );
    assert_eq!(output.schema.columns[0].kind, ColumnKind::Identifier);

    let ids = output.table.columns()[0].data.numeric_values();
    let expected: Vec<f64> = (1..=120).map(|i| i as f64).collect();
    assert_eq!(ids, expected);

    let tenure = output.table.column("tenure").expect("tenure").data.numeric_values();
    assert!(tenure.iter().all(|v| (0.0..=29.0).contains(v) && v.fract() == 0.0));

    let income = output.table.column("income").expect("income").data.numeric_values();
    assert!(income.iter().all(|v| (30_000.5..=117_748.25).contains(v)));

    assert!(output.table.column("plan").expect("plan").data.as_categorical().is_some());
    assert_eq!(output.report.identifiers_regenerated, vec!["customer_id"]);
    assert_eq!(output.report.moment_matched, vec!["income", "tenure"]);
}

#[test]
fn rejects_non_positive_rows() {
    let err = pipeline(MarginalSampler::new(1))
        .run(&real_table(), 0)
        .expect_err("rows");
    assert!(matches!(err, GenerationError::InvalidRowCount(0)));
}

struct ShortModel;
struct ShortFitted;

impl TabularModel for ShortModel {
    type Fitted = ShortFitted;

    fn fit(&self, _table: &Table, discrete: &[String]) -> Result<ShortFitted, GenerationError> {
        assert_eq!(discrete.to_vec(), vec!["plan".to_string()]);
        Ok(ShortFitted)
    }
}

impl FittedModel for ShortFitted {
    fn sample(&mut self, n_rows: usize) -> Result<Table, GenerationError> {
        let values = (0..n_rows).map(|i| Some(i as f64)).collect();
        Ok(Table::new(vec![Column::numeric("income", values)])?)
    }
}

#[test]
fn missing_sampled_columns_are_model_errors() {
    let err = pipeline(ShortModel).run(&real_table(), 10).expect_err("missing");
    match err {
        GenerationError::Model(message) => assert!(message.contains("tenure")),
        other => panic!("unexpected error: {other}"),
    }
}
