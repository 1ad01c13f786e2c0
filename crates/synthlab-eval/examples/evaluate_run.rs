use std::env;
use std::path::PathBuf;

use synthlab_eval::{EvaluateOptions, EvaluationEngine, load_table_csv};
use synthlab_infer::infer_schema;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let mut real_path: Option<PathBuf> = None;
    let mut synthetic_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--real" => real_path = args.next().map(PathBuf::from),
            "--synthetic" => synthetic_path = args.next().map(PathBuf::from),
            "--out" => out_dir = args.next().map(PathBuf::from),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let real_path = real_path.ok_or("missing --real csv")?;
    let synthetic_path = synthetic_path.ok_or("missing --synthetic csv")?;

    let real = load_table_csv(&real_path)?;
    let synthetic = load_table_csv(&synthetic_path)?;
    let schema = infer_schema(&real)?;

    let options = EvaluateOptions {
        out_dir,
        ..EvaluateOptions::default()
    };
    let run = EvaluationEngine::new(options).run_statistical(&real, &synthetic, &schema)?;

    if let Some(path) = &run.metrics_path {
        println!("metrics_path={}", path.display());
    }
    if let Some(path) = &run.report_path {
        println!("report_path={}", path.display());
    }
    println!("{}", run.report);
    Ok(())
}
