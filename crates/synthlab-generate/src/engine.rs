use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use synthlab_core::{Schema, Table};
use synthlab_infer::InferOptions;
use synthlab_spec::SchemaDefinition;

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationMode, GenerationReport};
use crate::output::csv::write_table_csv;
use crate::pipeline::{DataDrivenPipeline, TabularModel};
use crate::postprocess::apply_constraints;
use crate::schema_mode::generate_from_schema;

/// File name of the generated table inside a run directory.
pub const SYNTHETIC_CSV: &str = "synthetic.csv";
/// File name of the run report inside a run directory.
pub const REPORT_JSON: &str = "generation_report.json";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub schema: Schema,
    pub table: Table,
    pub report: GenerationReport,
}

/// Entry point that runs a generation path and persists its artifacts.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Rule-based generation from a declared schema.
    pub fn run_schema(
        &self,
        definition: &SchemaDefinition,
        n_rows: i64,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            columns = definition.columns.len(),
            rows = n_rows,
            seed = definition.seed,
            "schema generation started"
        );

        let schema = definition.to_schema();
        let generated = generate_from_schema(definition, n_rows).inspect_err(|err| {
            warn!(run_id = %run_id, error = %err, "schema generation failed");
        })?;
        let table = apply_constraints(&schema, generated, self.options.apply_constraints)?;

        let mut report = GenerationReport::new(run_id, GenerationMode::Schema);
        report.seed = Some(definition.seed);
        report.rows_requested = n_rows as u64;
        report.constraints_applied = self.options.apply_constraints;
        report.record_table(&table);

        self.persist(schema, table, report, start)
    }

    /// Data-driven generation: infer, fit, sample and conform.
    pub fn run_model<M: TabularModel>(
        &self,
        model: M,
        infer: InferOptions,
        real: &Table,
        n_rows: i64,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let pipeline = DataDrivenPipeline::new(model, infer, self.options.clone());
        let output = pipeline.run(real, n_rows).inspect_err(|err| {
            warn!(error = %err, "model generation failed");
        })?;
        self.persist(output.schema, output.table, output.report, start)
    }

    fn persist(
        &self,
        schema: Schema,
        table: Table,
        mut report: GenerationReport,
        start: Instant,
    ) -> Result<GenerationResult, GenerationError> {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{}", report.run_id));
        std::fs::create_dir_all(&run_dir)?;

        report.bytes_written = write_table_csv(&run_dir.join(SYNTHETIC_CSV), &table)?;
        report.duration_ms = start.elapsed().as_millis() as u64;
        write_report(&run_dir.join(REPORT_JSON), &report)?;
        std::fs::write(
            run_dir.join("schema.json"),
            serde_json::to_vec_pretty(&schema)?,
        )?;

        info!(
            run_id = %report.run_id,
            mode = ?report.mode,
            rows_generated = report.rows_generated,
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            run_dir,
            schema,
            table,
            report,
        })
    }
}

fn write_report(path: &Path, report: &GenerationReport) -> Result<(), GenerationError> {
    std::fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}
