use std::env;
use std::path::PathBuf;

use synthlab_generate::{GenerateOptions, GenerationEngine};
use synthlab_spec::parse_definition;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut definition_path: Option<PathBuf> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut rows: i64 = 100;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out_dir = args.next().map(PathBuf::from),
            "--rows" => rows = args.next().ok_or("missing --rows value")?.parse()?,
            _ => {
                if definition_path.is_none() {
                    definition_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let definition_path = definition_path.ok_or("missing definition path")?;
    let definition = parse_definition(&std::fs::read_to_string(&definition_path)?)?;

    let mut options = GenerateOptions::default();
    if let Some(out_dir) = out_dir {
        options.out_dir = out_dir;
    }

    let result = GenerationEngine::new(options).run_schema(&definition, rows)?;
    println!("run_dir={}", result.run_dir.display());
    Ok(())
}
