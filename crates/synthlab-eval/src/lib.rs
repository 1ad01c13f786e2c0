//! Fidelity evaluation for synthetic tables.
//!
//! Real-vs-synthetic comparison runs per-column KS and chi-square tests, a
//! correlation-matrix comparison and an adversarial classifier. Schema-only
//! checks validate a synthetic table against its declared definition.

pub mod adversarial;
pub mod consistency;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod forest;
pub mod interpret;
pub mod metrics;
pub mod model;
pub mod report;
pub mod statistics;
pub mod stats;

pub use adversarial::evaluate_adversarial;
pub use consistency::evaluate_schema_consistency;
pub use dataset::load_table_csv;
pub use engine::EvaluationEngine;
pub use errors::EvalError;
pub use metrics::{METRICS_VERSION, MetricsReport};
pub use model::{
    AdversarialResult, AucBand, ColumnTest, EvaluateOptions, EvaluationResult, EvaluationRun,
    Interpretation, SchemaConsistencyResult, SchemaValidity, SkippedTest, TestKind,
};
pub use report::render_report;
pub use statistics::{evaluate_statistical, evaluate_statistical_with_cancel};
pub use tokio_util::sync::CancellationToken;
