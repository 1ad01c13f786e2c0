mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use synthlab_core::{EngineConfig, Error as CoreError};
use synthlab_eval::{EvalError, EvaluateOptions, EvaluationEngine, load_table_csv};
use synthlab_generate::{GenerateOptions, GenerationEngine, GenerationError, MarginalSampler};
use synthlab_infer::{InferOptions, infer_schema_with_options};
use synthlab_spec::{SchemaDefinition, SpecError, definition_json_schema};

use registry::{LogFormat, init_logging, load_config, read_definition, read_schema, write_json};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("definition error: {0}")]
    Spec(#[from] SpecError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("schema consistency check failed")]
    CheckFailed,
}

#[derive(Parser, Debug)]
#[command(name = "synthlab", version, about = "Synthetic tabular data: infer, generate, evaluate")]
struct Cli {
    /// Engine configuration (TOML). Defaults apply to missing keys.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
    /// Append logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Infer a schema from a CSV file.
    Infer(InferArgs),
    /// Generate a synthetic CSV from a declared schema or a real CSV.
    Generate(GenerateArgs),
    /// Compare a synthetic CSV with the real one.
    Evaluate(EvaluateArgs),
    /// Check a synthetic CSV against a declared schema.
    Check(CheckArgs),
    /// Print the JSON Schema of the declared schema document.
    SchemaJson,
}

#[derive(Args, Debug)]
struct InferArgs {
    /// Input CSV with a header row.
    input: PathBuf,
    /// Write the schema here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Override the categorical threshold.
    #[arg(long)]
    categorical_threshold: Option<usize>,
    /// Force a column to be treated as an identifier.
    #[arg(long, value_name = "COLUMN")]
    identifier: Vec<String>,
    /// Never treat this column as an identifier.
    #[arg(long, value_name = "COLUMN")]
    not_identifier: Vec<String>,
    /// Emit a declared schema document instead of the inferred schema.
    #[arg(long, default_value_t = false)]
    definition: bool,
    /// Seed recorded in the declared document.
    #[arg(long, default_value_t = synthlab_spec::DEFAULT_SEED)]
    seed: u64,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Declared schema document (JSON).
    #[arg(long, conflicts_with = "from", required_unless_present = "from")]
    schema: Option<PathBuf>,
    /// Real CSV to learn marginals from.
    #[arg(long, value_name = "CSV")]
    from: Option<PathBuf>,
    /// Number of rows to generate.
    #[arg(long)]
    rows: i64,
    /// Directory that receives run folders.
    #[arg(long, default_value = "runs")]
    out_dir: PathBuf,
    /// Seed for the data-driven sampler.
    #[arg(long, default_value_t = synthlab_spec::DEFAULT_SEED)]
    seed: u64,
    /// Skip the constraint post-processor.
    #[arg(long, default_value_t = false)]
    no_constraints: bool,
    /// Skip moment matching in data-driven mode.
    #[arg(long, default_value_t = false)]
    no_moment_matching: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Real CSV.
    #[arg(long)]
    real: PathBuf,
    /// Synthetic CSV.
    #[arg(long)]
    synthetic: PathBuf,
    /// Inferred schema JSON; inferred from the real CSV when absent.
    #[arg(long)]
    schema: Option<PathBuf>,
    /// Directory for metrics.json and report.md; defaults to the synthetic file's directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Classifier training budget in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Declared schema document (JSON).
    #[arg(long)]
    schema: PathBuf,
    /// Synthetic CSV.
    #[arg(long)]
    data: PathBuf,
    /// Directory for metrics.json and report.md; defaults to the data file's directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_file.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    let timer = Instant::now();
    let outcome = match cli.command {
        Command::Infer(args) => run_infer(args, &config),
        Command::Generate(args) => run_generate(args, &config),
        Command::Evaluate(args) => run_evaluate(args, config),
        Command::Check(args) => run_check(args, config),
        Command::SchemaJson => run_schema_json(),
    };

    let duration_ms = timer.elapsed().as_millis() as u64;
    match &outcome {
        Ok(()) => tracing::info!(event = "command_finished", status = "success", duration_ms),
        Err(err) => {
            tracing::error!(event = "command_finished", status = "error", duration_ms, error = %err)
        }
    }
    outcome
}

fn run_infer(args: InferArgs, config: &EngineConfig) -> Result<(), CliError> {
    let mut options = InferOptions::from(&config.infer);
    if let Some(threshold) = args.categorical_threshold {
        options = options.with_threshold(threshold);
    }
    for column in args.identifier {
        options = options.with_identifier_override(column, true);
    }
    for column in args.not_identifier {
        options = options.with_identifier_override(column, false);
    }

    let table = load_table_csv(&args.input)?;
    let schema = infer_schema_with_options(&table, &options)?;
    tracing::info!(
        event = "schema_inferred",
        columns = schema.len(),
        rows = table.row_count()
    );

    let document = if args.definition {
        serde_json::to_value(SchemaDefinition::from_schema(&schema, args.seed)?)?
    } else {
        serde_json::to_value(&schema)?
    };
    emit(&document, args.out.as_deref())
}

fn run_generate(args: GenerateArgs, config: &EngineConfig) -> Result<(), CliError> {
    let options = GenerateOptions {
        out_dir: args.out_dir,
        apply_constraints: config.apply_constraints && !args.no_constraints,
        moment_matching: !args.no_moment_matching,
    };
    let engine = GenerationEngine::new(options);

    let result = match (args.schema, args.from) {
        (Some(path), None) => {
            let definition = read_definition(&path)?;
            engine.run_schema(&definition, args.rows)?
        }
        (None, Some(path)) => {
            let real = load_table_csv(&path)?;
            engine.run_model(
                MarginalSampler::new(args.seed),
                InferOptions::from(&config.infer),
                &real,
                args.rows,
            )?
        }
        _ => {
            return Err(CliError::InvalidArgs(
                "use exactly one of --schema or --from".to_string(),
            ));
        }
    };

    for warning in &result.report.warnings {
        tracing::warn!(event = "generation_warning", "{warning}");
    }
    println!("run_dir={}", result.run_dir.display());
    println!("rows={}", result.report.rows_generated);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs, mut config: EngineConfig) -> Result<(), CliError> {
    if args.timeout_ms.is_some() {
        config.adversarial.timeout_ms = args.timeout_ms;
    }
    let real = load_table_csv(&args.real)?;
    let synthetic = load_table_csv(&args.synthetic)?;
    let schema = match &args.schema {
        Some(path) => read_schema(path)?,
        None => infer_schema_with_options(&real, &InferOptions::from(&config.infer))?,
    };

    let out_dir = args
        .out_dir
        .or_else(|| args.synthetic.parent().map(PathBuf::from));
    let engine = EvaluationEngine::new(EvaluateOptions { config, out_dir });
    let run = engine.run_statistical(&real, &synthetic, &schema)?;

    if let Some(path) = &run.metrics_path {
        println!("metrics_path={}", path.display());
    }
    if let Some(path) = &run.report_path {
        println!("report_path={}", path.display());
    }
    Ok(())
}

fn run_check(args: CheckArgs, config: EngineConfig) -> Result<(), CliError> {
    let definition = read_definition(&args.schema)?;
    let table = load_table_csv(&args.data)?;

    let out_dir = args
        .out_dir
        .or_else(|| args.data.parent().map(PathBuf::from));
    let engine = EvaluationEngine::new(EvaluateOptions { config, out_dir });
    let run = engine.run_schema_consistency(&definition, &table)?;

    if let Some(path) = &run.metrics_path {
        println!("metrics_path={}", path.display());
    }
    let passed = run
        .metrics
        .schema_consistency
        .as_ref()
        .is_some_and(|result| result.is_pass());
    if passed {
        println!("schema_validity=PASS");
        Ok(())
    } else {
        println!("schema_validity=FAIL");
        Err(CliError::CheckFailed)
    }
}

fn run_schema_json() -> Result<(), CliError> {
    emit(&serde_json::to_value(definition_json_schema())?, None)
}

fn emit(document: &serde_json::Value, out: Option<&std::path::Path>) -> Result<(), CliError> {
    match out {
        Some(path) => {
            write_json(path, document)?;
            tracing::info!(event = "document_written", path = %path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(document)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["synthlab", "generate", "--rows", "5"]).is_err());
        assert!(
            Cli::try_parse_from([
                "synthlab", "generate", "--rows", "5", "--schema", "a.json", "--from", "b.csv",
            ])
            .is_err()
        );
        let cli = Cli::try_parse_from(["synthlab", "generate", "--rows", "5", "--schema", "a.json"])
            .expect("parse");
        assert!(matches!(cli.command, Command::Generate(GenerateArgs { rows: 5, .. })));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "synthlab",
            "evaluate",
            "--real",
            "real.csv",
            "--synthetic",
            "synth.csv",
            "--log-format",
            "json",
            "--timeout-ms",
            "250",
        ])
        .expect("parse");
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.timeout_ms, Some(250));
    }
}
