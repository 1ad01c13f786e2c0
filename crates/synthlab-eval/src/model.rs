use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use synthlab_core::EngineConfig;

use crate::metrics::MetricsReport;

/// Options for the evaluation engine.
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub config: EngineConfig,
    /// Directory that receives `metrics.json` and `report.md`.
    pub out_dir: Option<PathBuf>,
}

/// Which distribution test produced a column result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    KolmogorovSmirnov,
    ChiSquare,
}

impl TestKind {
    pub fn label(self) -> &'static str {
        match self {
            TestKind::KolmogorovSmirnov => "KS",
            TestKind::ChiSquare => "chi-square",
        }
    }
}

/// Outcome of one per-column distribution test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTest {
    pub column: String,
    pub test: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    pub similar: bool,
}

/// A column test that could not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTest {
    pub column: String,
    pub test: TestKind,
    pub reason: String,
}

/// Verdict band for an adversarial AUC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AucBand {
    Excellent,
    Good,
    Borderline,
    Warning,
    Poor,
}

impl AucBand {
    /// Band by distance of `auc` from 0.5.
    pub fn from_auc(auc: f64) -> Self {
        let distance = (auc - 0.5).abs();
        if distance <= 0.05 {
            AucBand::Excellent
        } else if distance <= 0.10 {
            AucBand::Good
        } else if distance <= 0.15 {
            AucBand::Borderline
        } else if distance <= 0.30 {
            AucBand::Warning
        } else {
            AucBand::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AucBand::Excellent => "excellent",
            AucBand::Good => "good",
            AucBand::Borderline => "borderline",
            AucBand::Warning => "warning",
            AucBand::Poor => "poor",
        }
    }
}

/// Details of the real-vs-synthetic classifier run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversarialResult {
    pub auc: f64,
    pub band: AucBand,
    pub features: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trees: usize,
}

/// Human-readable verdicts per metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub ks_test: String,
    pub chi_square: String,
    pub correlation_mse: String,
    pub adversarial_auc: String,
}

/// Real-vs-synthetic similarity result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// KS results for integer and float columns, in schema order.
    pub ks_test: Vec<ColumnTest>,
    /// Chi-square results for categorical columns, in schema order.
    pub chi_square: Vec<ColumnTest>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTest>,
    pub correlation_mse: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_note: Option<String>,
    pub adversarial_auc: f64,
    pub adversarial: AdversarialResult,
    pub interpretation: Interpretation,
}

impl EvaluationResult {
    pub fn column_tests(&self) -> impl Iterator<Item = &ColumnTest> {
        self.ks_test.iter().chain(&self.chi_square)
    }

    pub fn dissimilar_columns(&self) -> Vec<&str> {
        self.column_tests()
            .filter(|test| !test.similar)
            .map(|test| test.column.as_str())
            .collect()
    }
}

/// Overall schema-consistency verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaValidity {
    Pass,
    Fail,
}

/// Synthetic-vs-declared-schema conformance result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConsistencyResult {
    pub schema_validity: SchemaValidity,
    pub type_consistency: String,
    pub range_violations: u64,
    pub category_violations: u64,
    pub null_rate: BTreeMap<String, f64>,
    pub identifier_issues: Option<String>,
}

impl SchemaValidity {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaValidity::Pass => "PASS",
            SchemaValidity::Fail => "FAIL",
        }
    }
}

impl SchemaConsistencyResult {
    pub fn is_pass(&self) -> bool {
        self.schema_validity == SchemaValidity::Pass
    }
}

/// Persisted output of an engine run.
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    pub metrics_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub metrics: MetricsReport,
    pub report: String,
}
