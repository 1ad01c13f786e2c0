use serde::{Deserialize, Serialize};

use crate::model::{EvaluationResult, SchemaConsistencyResult};

/// Metrics contract version for evaluation output.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable metrics for one evaluation, written as `metrics.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub metrics_version: String,
    pub run_id: String,
    pub rows: RowCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistical: Option<EvaluationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_consistency: Option<SchemaConsistencyResult>,
    pub performance: PerformanceMetrics,
}

/// Rows seen on each side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowCounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real: Option<u64>,
    pub synthetic: u64,
}

/// Performance timings for the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub evaluate_ms: u128,
    pub total_ms: u128,
}
