use synthlab_core::EngineConfig;

use crate::model::{AucBand, ColumnTest, EvaluationResult, Interpretation};

/// Turn raw metrics into one verdict line per metric.
pub fn interpret(result: &EvaluationResult, config: &EngineConfig) -> Interpretation {
    let alpha = config.significance_level;
    Interpretation {
        ks_test: column_verdict(&result.ks_test, "numeric", alpha),
        chi_square: column_verdict(&result.chi_square, "categorical", alpha),
        correlation_mse: correlation_verdict(result, config),
        adversarial_auc: adversarial_verdict(result.adversarial_auc),
    }
}

fn column_verdict(tests: &[ColumnTest], family: &str, alpha: f64) -> String {
    if tests.is_empty() {
        return format!("SKIPPED - No {family} columns tested");
    }
    let failed: Vec<&str> = tests
        .iter()
        .filter(|test| !test.similar)
        .map(|test| test.column.as_str())
        .collect();
    if failed.is_empty() {
        format!("PASS - All {family} distributions match (p > {alpha})")
    } else {
        format!("FAIL - Distributions differ for: {}", failed.join(", "))
    }
}

fn correlation_verdict(result: &EvaluationResult, config: &EngineConfig) -> String {
    if let Some(note) = &result.correlation_note {
        return format!("SKIPPED - {note}");
    }
    let mse = result.correlation_mse;
    let thresholds = &config.correlation;
    if mse < thresholds.well_preserved {
        format!("PASS - Relationships well-preserved (MSE={mse:.6})")
    } else if mse <= thresholds.minor_distortion {
        format!("WARNING - Minor distortion (MSE={mse:.6})")
    } else {
        format!("FAIL - Significant distortion (MSE={mse:.6})")
    }
}

fn adversarial_verdict(auc: f64) -> String {
    let text = match AucBand::from_auc(auc) {
        AucBand::Excellent => "EXCELLENT - Synthetic indistinguishable from real",
        AucBand::Good => "GOOD - Limited distinguishability",
        AucBand::Borderline => "BORDERLINE - Some distinguishing signal",
        AucBand::Warning => "WARNING - Easily distinguishable",
        AucBand::Poor => "POOR - Synthetic rows are trivially separable",
    };
    format!("{text} (AUC={auc:.4})")
}
