use std::path::Path;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use synthlab_core::{Schema, Table};
use synthlab_spec::SchemaDefinition;

use crate::consistency::evaluate_schema_consistency;
use crate::errors::EvalError;
use crate::metrics::{METRICS_VERSION, MetricsReport, PerformanceMetrics, RowCounts};
use crate::model::{EvaluateOptions, EvaluationRun};
use crate::report::render_report;
use crate::statistics::evaluate_statistical_with_cancel;

/// Runs an evaluation and persists `metrics.json` and `report.md`.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    options: EvaluateOptions,
    cancel: CancellationToken,
}

impl EvaluationEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with the caller.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Real-vs-synthetic statistical similarity.
    pub fn run_statistical(
        &self,
        real: &Table,
        synthetic: &Table,
        schema: &Schema,
    ) -> Result<EvaluationRun, EvalError> {
        let total_start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            real_rows = real.row_count(),
            synthetic_rows = synthetic.row_count(),
            columns = schema.len(),
            "statistical evaluation started"
        );

        let evaluate_start = Instant::now();
        let result = evaluate_statistical_with_cancel(
            real,
            synthetic,
            schema,
            &self.options.config,
            &self.cancel,
        )
        .inspect_err(|err| warn!(run_id = %run_id, error = %err, "evaluation failed"))?;
        let evaluate_ms = evaluate_start.elapsed().as_millis();

        let metrics = MetricsReport {
            metrics_version: METRICS_VERSION.to_string(),
            run_id,
            rows: RowCounts {
                real: Some(real.row_count() as u64),
                synthetic: synthetic.row_count() as u64,
            },
            statistical: Some(result),
            schema_consistency: None,
            performance: PerformanceMetrics {
                evaluate_ms,
                total_ms: total_start.elapsed().as_millis(),
            },
        };
        self.persist(metrics)
    }

    /// Synthetic-vs-declared-schema conformance.
    pub fn run_schema_consistency(
        &self,
        definition: &SchemaDefinition,
        synthetic: &Table,
    ) -> Result<EvaluationRun, EvalError> {
        let total_start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            synthetic_rows = synthetic.row_count(),
            columns = definition.columns.len(),
            "schema consistency evaluation started"
        );

        let evaluate_start = Instant::now();
        let result = evaluate_schema_consistency(definition, synthetic);
        let evaluate_ms = evaluate_start.elapsed().as_millis();

        let metrics = MetricsReport {
            metrics_version: METRICS_VERSION.to_string(),
            run_id,
            rows: RowCounts {
                real: None,
                synthetic: synthetic.row_count() as u64,
            },
            statistical: None,
            schema_consistency: Some(result),
            performance: PerformanceMetrics {
                evaluate_ms,
                total_ms: total_start.elapsed().as_millis(),
            },
        };
        self.persist(metrics)
    }

    fn persist(&self, metrics: MetricsReport) -> Result<EvaluationRun, EvalError> {
        let report = render_report(&metrics);
        let Some(out_dir) = self.options.out_dir.as_deref() else {
            return Ok(EvaluationRun {
                metrics_path: None,
                report_path: None,
                metrics,
                report,
            });
        };

        let (metrics_path, report_path) = write_artifacts(out_dir, &metrics, &report)?;
        info!(
            run_id = %metrics.run_id,
            metrics_path = %metrics_path.display(),
            total_ms = metrics.performance.total_ms as u64,
            "evaluation completed"
        );
        Ok(EvaluationRun {
            metrics_path: Some(metrics_path),
            report_path: Some(report_path),
            metrics,
            report,
        })
    }
}

fn write_artifacts(
    out_dir: &Path,
    metrics: &MetricsReport,
    report: &str,
) -> Result<(std::path::PathBuf, std::path::PathBuf), EvalError> {
    std::fs::create_dir_all(out_dir)?;

    let metrics_path = out_dir.join("metrics.json");
    std::fs::write(&metrics_path, serde_json::to_vec_pretty(metrics)?)?;

    let report_path = out_dir.join("report.md");
    std::fs::write(&report_path, report.as_bytes())?;

    Ok((metrics_path, report_path))
}
