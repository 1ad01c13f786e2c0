use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use synthlab_core::{Column, ColumnData, ColumnInfo, Schema, Table};
use synthlab_infer::{InferOptions, infer_schema_with_options};

use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationMode, GenerationReport};
use crate::postprocess::apply_constraints;

/// Standard deviation below which a sampled column collapses to the real mean.
const MIN_SAMPLED_STD: f64 = 1e-6;

/// Trainer for a generative tabular model.
pub trait TabularModel {
    type Fitted: FittedModel;

    /// Fit on a table whose identifier columns are already removed.
    fn fit(&self, table: &Table, discrete_columns: &[String])
    -> Result<Self::Fitted, GenerationError>;
}

/// A fitted model that can sample new rows.
pub trait FittedModel {
    fn sample(&mut self, n_rows: usize) -> Result<Table, GenerationError>;
}

/// Output of a data-driven run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub schema: Schema,
    pub table: Table,
    pub report: GenerationReport,
}

/// Infer, fit, sample and conform a synthetic table from real data.
#[derive(Debug, Clone)]
pub struct DataDrivenPipeline<M> {
    model: M,
    infer: InferOptions,
    options: GenerateOptions,
}

impl<M: TabularModel> DataDrivenPipeline<M> {
    pub fn new(model: M, infer: InferOptions, options: GenerateOptions) -> Self {
        Self {
            model,
            infer,
            options,
        }
    }

    pub fn run(&self, real: &Table, n_rows: i64) -> Result<PipelineOutput, GenerationError> {
        if n_rows <= 0 {
            return Err(GenerationError::InvalidRowCount(n_rows));
        }
        let rows = n_rows as usize;
        let schema = infer_schema_with_options(real, &self.infer)?;
        let mut report = GenerationReport::new(uuid::Uuid::new_v4().to_string(), GenerationMode::Model);
        report.rows_requested = rows as u64;

        let training = training_table(real, &schema)?;
        let moments = column_moments(real, &schema);
        let discrete: Vec<String> = schema
            .categorical_columns()
            .map(|col| col.name.clone())
            .collect();

        info!(
            rows = real.row_count(),
            columns = training.column_count(),
            discrete = discrete.len(),
            "fitting tabular model"
        );
        let mut fitted = self.model.fit(&training, &discrete)?;
        let sampled = fitted.sample(rows)?;
        if sampled.row_count() != rows {
            return Err(GenerationError::Model(format!(
                "model returned {} rows, expected {rows}",
                sampled.row_count()
            )));
        }

        let mut by_name: BTreeMap<String, ColumnData> = sampled
            .into_columns()
            .into_iter()
            .map(|col| (col.name, col.data))
            .collect();

        if self.options.moment_matching {
            for (name, (mean, std)) in &moments {
                if let Some(data) = by_name.get_mut(name)
                    && let ColumnData::Numeric(values) = data
                {
                    match_moments(values, *mean, *std);
                    report.record_moment_match(name);
                }
            }
        }

        let mut columns = Vec::with_capacity(schema.len());
        for info in &schema.columns {
            if info.is_identifier {
                columns.push(regenerate_identifier(info, rows)?);
                report.record_identifier(&info.name);
                continue;
            }
            let data = by_name.remove(&info.name).ok_or_else(|| {
                GenerationError::Model(format!("model did not produce column '{}'", info.name))
            })?;
            columns.push(Column {
                name: info.name.clone(),
                data,
            });
        }
        for extra in by_name.keys() {
            report.record_warning(format!("dropped unexpected column '{extra}' from sample"));
        }

        let table = apply_constraints(&schema, Table::new(columns)?, self.options.apply_constraints)?;
        report.constraints_applied = self.options.apply_constraints;
        report.record_table(&table);
        info!(
            rows = table.row_count(),
            moment_matched = report.moment_matched.len(),
            identifiers = report.identifiers_regenerated.len(),
            "synthetic table sampled"
        );

        Ok(PipelineOutput {
            schema,
            table,
            report,
        })
    }
}

fn training_table(real: &Table, schema: &Schema) -> Result<Table, GenerationError> {
    let columns = real
        .columns()
        .iter()
        .filter(|col| {
            schema
                .column(&col.name)
                .is_some_and(|info| !info.is_identifier)
        })
        .cloned()
        .collect();
    Ok(Table::new(columns)?)
}

/// Mean and sample standard deviation per numeric, non-identifier column.
fn column_moments(real: &Table, schema: &Schema) -> BTreeMap<String, (f64, f64)> {
    schema
        .numeric_columns()
        .filter_map(|info| {
            let values = real.column(&info.name)?.data.numeric_values();
            let (mean, std) = mean_std(&values)?;
            Some((info.name.clone(), (mean, std)))
        })
        .collect()
}

fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return Some((mean, 0.0));
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, var.sqrt()))
}

fn match_moments(values: &mut [Option<f64>], mean: f64, std: f64) {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    let Some((sampled_mean, sampled_std)) = mean_std(&observed) else {
        return;
    };
    for value in values.iter_mut().flatten() {
        *value = if sampled_std < MIN_SAMPLED_STD {
            mean
        } else {
            (*value - sampled_mean) / sampled_std * std + mean
        };
    }
}

fn regenerate_identifier(info: &ColumnInfo, rows: usize) -> Result<Column, GenerationError> {
    let start = info.identifier_start();
    let ids = (0..rows)
        .map(|row| {
            i64::try_from(row)
                .ok()
                .and_then(|offset| start.checked_add(offset))
                .map(|id| Some(id as f64))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            GenerationError::InvalidSchema(format!(
                "identifier '{}' starting at {start} cannot number {rows} rows",
                info.name
            ))
        })?;
    Ok(Column::numeric(info.name.clone(), ids))
}

/// Baseline model that resamples each column's observed values independently.
///
/// Keeps marginals, discards cross-column structure.
#[derive(Debug, Clone)]
pub struct MarginalSampler {
    seed: u64,
}

impl MarginalSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Fitted [`MarginalSampler`].
#[derive(Debug, Clone)]
pub struct FittedMarginals {
    columns: Vec<Column>,
    rng: ChaCha8Rng,
}

impl TabularModel for MarginalSampler {
    type Fitted = FittedMarginals;

    fn fit(
        &self,
        table: &Table,
        discrete_columns: &[String],
    ) -> Result<Self::Fitted, GenerationError> {
        if table.row_count() == 0 {
            return Err(GenerationError::Model("cannot fit on an empty table".to_string()));
        }
        debug!(discrete = ?discrete_columns, "fitting marginal sampler");
        Ok(FittedMarginals {
            columns: table.columns().to_vec(),
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        })
    }
}

impl FittedModel for FittedMarginals {
    fn sample(&mut self, n_rows: usize) -> Result<Table, GenerationError> {
        let rng = &mut self.rng;
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let len = col.len();
                let data = match &col.data {
                    ColumnData::Numeric(values) => ColumnData::Numeric(
                        (0..n_rows).map(|_| values[rng.random_range(0..len)]).collect(),
                    ),
                    ColumnData::Categorical(values) => ColumnData::Categorical(
                        (0..n_rows)
                            .map(|_| values[rng.random_range(0..len)].clone())
                            .collect(),
                    ),
                };
                Column {
                    name: col.name.clone(),
                    data,
                }
            })
            .collect();
        Ok(Table::new(columns)?)
    }
}
