use std::env;
use std::path::Path;

use serde_json::Value;
use synthlab_spec::{ValidationReport, definition_json_schema, validate_definition_document};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).ok_or("missing definition path")?;
    let definition_json = load_json(Path::new(&path))?;
    let json_schema = serde_json::to_value(definition_json_schema())?;

    match validate_definition_document(&definition_json, &json_schema) {
        Ok(validated) if validated.warnings.is_empty() => {
            println!(
                "definition ok: {} columns, seed {}",
                validated.definition.columns.len(),
                validated.definition.seed
            );
        }
        Ok(validated) => {
            eprintln!("definition validated with warnings:");
            print_report(&ValidationReport {
                errors: Vec::new(),
                warnings: validated.warnings,
            });
        }
        Err(report) => {
            eprintln!("definition validation failed");
            print_report(&report);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn load_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_report(report: &ValidationReport) {
    for issue in report.errors.iter().chain(&report.warnings) {
        eprintln!("{:?} {} {}: {}", issue.severity, issue.code, issue.path, issue.message);
    }
}
