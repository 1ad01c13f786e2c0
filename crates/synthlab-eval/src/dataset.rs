use std::path::Path;

use synthlab_core::Table;

use crate::errors::EvalError;

/// Load a CSV file with a header row into a typed table.
pub fn load_table_csv(path: &Path) -> Result<Table, EvalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table::from_string_records(&headers, &records)?)
}
