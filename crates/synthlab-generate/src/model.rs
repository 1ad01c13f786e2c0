use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    /// Run the constraint post-processor on generated tables.
    pub apply_constraints: bool,
    /// Rescale sampled numeric columns to the real mean and standard deviation.
    pub moment_matching: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            apply_constraints: true,
            moment_matching: true,
        }
    }
}

/// Which path produced a generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Rule-based generation from a declared schema.
    Schema,
    /// Fit-and-sample through a tabular model.
    Model,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub mode: GenerationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub columns: u64,
    pub null_cells: u64,
    /// Columns rescaled to the real moments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moment_matched: Vec<String>,
    /// Identifier columns renumbered after sampling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers_regenerated: Vec<String>,
    pub constraints_applied: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, mode: GenerationMode) -> Self {
        Self {
            run_id,
            mode,
            seed: None,
            rows_requested: 0,
            rows_generated: 0,
            columns: 0,
            null_cells: 0,
            moment_matched: Vec::new(),
            identifiers_regenerated: Vec::new(),
            constraints_applied: false,
            warnings: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, table: &synthlab_core::Table) {
        self.rows_generated = table.row_count() as u64;
        self.columns = table.column_count() as u64;
        self.null_cells = table
            .columns()
            .iter()
            .map(|col| col.data.null_count() as u64)
            .sum();
    }

    pub fn record_moment_match(&mut self, column: &str) {
        self.moment_matched.push(column.to_string());
    }

    pub fn record_identifier(&mut self, column: &str) {
        self.identifiers_regenerated.push(column.to_string());
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
