use crate::metrics::MetricsReport;
use crate::model::{EvaluationResult, SchemaConsistencyResult};

/// Render a deterministic markdown report from evaluation metrics.
pub fn render_report(metrics: &MetricsReport) -> String {
    let mut lines = Vec::new();

    lines.push("# Synthlab Evaluation Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", metrics.run_id));
    if let Some(real) = metrics.rows.real {
        lines.push(format!("- real rows: {real}"));
    }
    lines.push(format!("- synthetic rows: {}", metrics.rows.synthetic));
    lines.push(format!("- duration_ms: {}", metrics.performance.total_ms));
    lines.push(String::new());

    if let Some(result) = &metrics.statistical {
        push_statistical(&mut lines, result);
    }
    if let Some(result) = &metrics.schema_consistency {
        push_consistency(&mut lines, result);
    }

    lines.push("## Recommendations".to_string());
    lines.extend(recommendations(metrics));
    lines.join("\n")
}

fn push_statistical(lines: &mut Vec<String>, result: &EvaluationResult) {
    lines.push("## Column tests".to_string());
    lines.push("| column | test | statistic | p_value | similar |".to_string());
    lines.push("| --- | --- | --- | --- | --- |".to_string());
    for test in result.column_tests() {
        lines.push(format!(
            "| {} | {} | {:.4} | {:.4} | {} |",
            test.column,
            test.test.label(),
            test.statistic,
            test.p_value,
            if test.similar { "yes" } else { "no" }
        ));
    }
    lines.push(String::new());

    if !result.skipped.is_empty() {
        lines.push("## Skipped tests".to_string());
        for skipped in &result.skipped {
            lines.push(format!(
                "- {} ({}): {}",
                skipped.column,
                skipped.test.label(),
                skipped.reason
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Summary metrics".to_string());
    lines.push(format!("- correlation_mse: {:.6}", result.correlation_mse));
    lines.push(format!(
        "- adversarial_auc: {:.4} ({})",
        result.adversarial_auc,
        result.adversarial.band.as_str()
    ));
    lines.push(format!(
        "- classifier: {} trees, {} features, {} train / {} test rows",
        result.adversarial.trees,
        result.adversarial.features,
        result.adversarial.train_rows,
        result.adversarial.test_rows
    ));
    lines.push(String::new());

    lines.push("## Interpretation".to_string());
    let interpretation = &result.interpretation;
    lines.push(format!("- KS test: {}", interpretation.ks_test));
    lines.push(format!("- Chi-square: {}", interpretation.chi_square));
    lines.push(format!("- Correlation: {}", interpretation.correlation_mse));
    lines.push(format!("- Adversarial: {}", interpretation.adversarial_auc));
    lines.push(String::new());
}

fn push_consistency(lines: &mut Vec<String>, result: &SchemaConsistencyResult) {
    lines.push("## Schema consistency".to_string());
    lines.push(format!("- validity: {}", result.schema_validity.as_str()));
    lines.push(format!("- types: {}", result.type_consistency));
    lines.push(format!("- range violations: {}", result.range_violations));
    lines.push(format!("- category violations: {}", result.category_violations));
    lines.push(format!(
        "- identifier issues: {}",
        result.identifier_issues.as_deref().unwrap_or("none")
    ));
    lines.push(String::new());

    lines.push("| column | null_rate |".to_string());
    lines.push("| --- | --- |".to_string());
    for (column, rate) in &result.null_rate {
        lines.push(format!("| {column} | {rate:.4} |"));
    }
    lines.push(String::new());
}

fn recommendations(metrics: &MetricsReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(result) = &metrics.statistical {
        let dissimilar = result.dissimilar_columns();
        if !dissimilar.is_empty() {
            lines.push(format!(
                "- revisit the model for columns with shifted distributions: {}.",
                dissimilar.join(", ")
            ));
        }
        if result.correlation_note.is_none() && result.correlation_mse >= 0.05 {
            lines.push("- cross-column relationships drift; consider a joint model.".to_string());
        }
        if (result.adversarial_auc - 0.5).abs() > 0.10 {
            lines.push("- a classifier separates the tables; inspect top features.".to_string());
        }
    }
    if let Some(result) = &metrics.schema_consistency
        && !result.is_pass()
    {
        lines.push("- fix generation bounds or declared values for failing columns.".to_string());
    }
    if lines.is_empty() {
        lines.push("- no issues detected; compare metrics across runs for drift.".to_string());
    }
    lines
}
