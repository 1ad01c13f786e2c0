use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use synthlab_core::{ColumnData, ColumnInfo, EngineConfig, Schema, Table};

use crate::adversarial::evaluate_adversarial;
use crate::errors::EvalError;
use crate::interpret::interpret;
use crate::model::{ColumnTest, EvaluationResult, SkippedTest, TestKind};
use crate::stats::{chi_square_homogeneity, correlation_matrix, ks_two_sample, matrix_mse};

/// Compare a synthetic table with the real one it imitates.
///
/// Identifier columns are ignored. Local gaps (a column empty on one side)
/// become [`SkippedTest`] entries; a blocked adversarial run fails the whole
/// evaluation.
pub fn evaluate_statistical(
    real: &Table,
    synthetic: &Table,
    schema: &Schema,
    config: &EngineConfig,
) -> Result<EvaluationResult, EvalError> {
    evaluate_statistical_with_cancel(real, synthetic, schema, config, &CancellationToken::new())
}

/// [`evaluate_statistical`] with cooperative cancellation between column tests.
pub fn evaluate_statistical_with_cancel(
    real: &Table,
    synthetic: &Table,
    schema: &Schema,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<EvaluationResult, EvalError> {
    let alpha = config.significance_level;
    let mut ks_test = Vec::new();
    let mut chi_square = Vec::new();
    let mut skipped = Vec::new();

    for info in schema.trainable_columns() {
        if cancel.is_cancelled() {
            return Err(EvalError::Cancelled);
        }
        let kind = if info.is_numeric() {
            TestKind::KolmogorovSmirnov
        } else {
            TestKind::ChiSquare
        };
        let (Some(r), Some(s)) = (real.column(&info.name), synthetic.column(&info.name)) else {
            skipped.push(skip(info, kind, "column missing from one of the tables"));
            continue;
        };

        let outcome = match kind {
            TestKind::KolmogorovSmirnov => ks_column(info, &r.data, &s.data, alpha),
            TestKind::ChiSquare => chi_square_column(info, &r.data, &s.data, alpha),
        };
        match outcome {
            Ok(test) => {
                debug!(
                    column = %test.column,
                    test = test.test.label(),
                    statistic = test.statistic,
                    p_value = test.p_value,
                    "column tested"
                );
                match kind {
                    TestKind::KolmogorovSmirnov => ks_test.push(test),
                    TestKind::ChiSquare => chi_square.push(test),
                }
            }
            Err(skipped_test) => {
                warn!(column = %skipped_test.column, reason = %skipped_test.reason, "column test skipped");
                skipped.push(skipped_test);
            }
        }
    }

    let (correlation_mse, correlation_note) = correlation(real, synthetic, schema);

    if cancel.is_cancelled() {
        return Err(EvalError::Cancelled);
    }
    let adversarial = evaluate_adversarial(real, synthetic, schema, &config.adversarial, cancel)?;

    let mut result = EvaluationResult {
        ks_test,
        chi_square,
        skipped,
        correlation_mse,
        correlation_note,
        adversarial_auc: adversarial.auc,
        adversarial,
        interpretation: Default::default(),
    };
    result.interpretation = interpret(&result, config);

    info!(
        ks_tests = result.ks_test.len(),
        chi_square_tests = result.chi_square.len(),
        skipped = result.skipped.len(),
        correlation_mse = result.correlation_mse,
        adversarial_auc = result.adversarial_auc,
        "statistical evaluation finished"
    );
    Ok(result)
}

fn skip(info: &ColumnInfo, test: TestKind, reason: impl Into<String>) -> SkippedTest {
    SkippedTest {
        column: info.name.clone(),
        test,
        reason: reason.into(),
    }
}

fn ks_column(
    info: &ColumnInfo,
    real: &ColumnData,
    synthetic: &ColumnData,
    alpha: f64,
) -> Result<ColumnTest, SkippedTest> {
    let kind = TestKind::KolmogorovSmirnov;
    let real_values = real.numeric_values();
    let synthetic_values = synthetic.numeric_values();
    let result = ks_two_sample(&real_values, &synthetic_values).ok_or_else(|| {
        let side = if real_values.is_empty() { "real" } else { "synthetic" };
        skip(info, kind, format!("no numeric values in {side} table"))
    })?;
    Ok(ColumnTest {
        column: info.name.clone(),
        test: kind,
        statistic: result.statistic,
        p_value: result.p_value,
        similar: result.p_value > alpha,
    })
}

fn chi_square_column(
    info: &ColumnInfo,
    real: &ColumnData,
    synthetic: &ColumnData,
    alpha: f64,
) -> Result<ColumnTest, SkippedTest> {
    let kind = TestKind::ChiSquare;
    let real_counts = label_counts(real);
    let synthetic_counts = label_counts(synthetic);
    if real_counts.is_empty() || synthetic_counts.is_empty() {
        let side = if real_counts.is_empty() { "real" } else { "synthetic" };
        return Err(skip(info, kind, format!("no observed values in {side} table")));
    }

    let mut union: Vec<&str> = real_counts
        .keys()
        .chain(synthetic_counts.keys())
        .map(String::as_str)
        .collect();
    union.sort_unstable();
    union.dedup();

    let observed_real: Vec<u64> = union
        .iter()
        .map(|c| real_counts.get(*c).copied().unwrap_or(0))
        .collect();
    let observed_synthetic: Vec<u64> = union
        .iter()
        .map(|c| synthetic_counts.get(*c).copied().unwrap_or(0))
        .collect();

    let result = chi_square_homogeneity(&observed_real, &observed_synthetic);
    Ok(ColumnTest {
        column: info.name.clone(),
        test: kind,
        statistic: result.statistic,
        p_value: result.p_value,
        similar: result.p_value > alpha,
    })
}

fn label_counts(data: &ColumnData) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for label in data.labels().into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

fn correlation(real: &Table, synthetic: &Table, schema: &Schema) -> (f64, Option<String>) {
    let names: Vec<&str> = schema
        .numeric_columns()
        .map(|info| info.name.as_str())
        .filter(|name| real.column(name).is_some() && synthetic.column(name).is_some())
        .collect();
    if names.len() < 2 {
        return (
            0.0,
            Some(format!(
                "correlation skipped: {} numeric column(s), at least 2 required",
                names.len()
            )),
        );
    }

    let matrix_for = |table: &Table| {
        let columns: Vec<Vec<Option<f64>>> = names
            .iter()
            .filter_map(|name| table.column(name))
            .map(|col| numeric_cells(&col.data))
            .collect();
        correlation_matrix(&columns)
    };
    (matrix_mse(&matrix_for(real), &matrix_for(synthetic)), None)
}

fn numeric_cells(data: &ColumnData) -> Vec<Option<f64>> {
    match data {
        ColumnData::Numeric(values) => values.clone(),
        ColumnData::Categorical(values) => values
            .iter()
            .map(|value| {
                value
                    .as_deref()
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect(),
    }
}
