use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use synthlab_core::{ColumnData, Table};
use synthlab_spec::{ColumnDefinition, DeclaredType, SchemaDefinition};

use crate::model::{SchemaConsistencyResult, SchemaValidity};

/// Check a synthetic table against the schema it was declared with.
///
/// Counts out-of-range numbers and undeclared categories, records null rates,
/// and validates identifier columns (no nulls, integers, unique, starting at
/// `start`, continuous). Missing columns and non-conforming types are listed
/// in `type_consistency` and also fail the check.
pub fn evaluate_schema_consistency(
    definition: &SchemaDefinition,
    table: &Table,
) -> SchemaConsistencyResult {
    let mut type_issues = Vec::new();
    let mut identifier_issues = Vec::new();
    let mut range_violations = 0u64;
    let mut category_violations = 0u64;
    let mut null_rate = BTreeMap::new();

    for column in &definition.columns {
        let Some(data) = table.column(&column.name).map(|col| &col.data) else {
            type_issues.push(format!("Missing column: {}", column.name));
            continue;
        };
        let rows = data.len();
        let rate = if rows == 0 {
            0.0
        } else {
            data.null_count() as f64 / rows as f64
        };
        null_rate.insert(column.name.clone(), rate);

        match column.column_type {
            DeclaredType::Int | DeclaredType::Float => {
                let (values, unparsable) = numeric_cells(data);
                if unparsable > 0 {
                    type_issues.push(format!("Column {} is not numeric", column.name));
                } else if column.column_type == DeclaredType::Int
                    && values.iter().any(|v| v.fract() != 0.0)
                {
                    type_issues.push(format!("Column {} is not integer", column.name));
                }
                range_violations += count_out_of_range(column, &values);
            }
            DeclaredType::Categorical => {
                let allowed: BTreeSet<&str> = column.values.iter().map(String::as_str).collect();
                category_violations += data
                    .labels()
                    .iter()
                    .flatten()
                    .filter(|label| !allowed.contains(label.as_str()))
                    .count() as u64;
            }
            DeclaredType::Identifier => {
                if let Some(issue) = check_identifier(column, data) {
                    identifier_issues.push(issue);
                }
            }
        }
    }

    let identifier_issues = if identifier_issues.is_empty() {
        None
    } else {
        Some(identifier_issues.join("; "))
    };
    let schema_validity = if type_issues.is_empty()
        && range_violations == 0
        && category_violations == 0
        && identifier_issues.is_none()
    {
        SchemaValidity::Pass
    } else {
        SchemaValidity::Fail
    };
    let type_consistency = if type_issues.is_empty() {
        "All columns match declared types".to_string()
    } else {
        type_issues.join("; ")
    };

    info!(
        validity = ?schema_validity,
        range_violations,
        category_violations,
        rows = table.row_count(),
        "schema consistency evaluated"
    );

    SchemaConsistencyResult {
        schema_validity,
        type_consistency,
        range_violations,
        category_violations,
        null_rate,
        identifier_issues,
    }
}

/// Parsed non-null numbers and the count of non-null cells that are not numbers.
fn numeric_cells(data: &ColumnData) -> (Vec<f64>, usize) {
    match data {
        ColumnData::Numeric(values) => (values.iter().flatten().copied().collect(), 0),
        ColumnData::Categorical(values) => {
            let mut parsed = Vec::new();
            let mut unparsable = 0;
            for value in values.iter().flatten() {
                match value.trim().parse::<f64>() {
                    Ok(number) if number.is_finite() => parsed.push(number),
                    _ => unparsable += 1,
                }
            }
            (parsed, unparsable)
        }
    }
}

fn count_out_of_range(column: &ColumnDefinition, values: &[f64]) -> u64 {
    values
        .iter()
        .filter(|&&v| column.min.is_some_and(|min| v < min) || column.max.is_some_and(|max| v > max))
        .count() as u64
}

fn check_identifier(column: &ColumnDefinition, data: &ColumnData) -> Option<String> {
    let name = &column.name;
    let n = data.len();
    if n == 0 {
        return None;
    }
    if data.null_count() > 0 {
        return Some(format!("Identifier {name} contains null values"));
    }

    let (values, unparsable) = numeric_cells(data);
    if unparsable > 0 || values.iter().any(|v| v.fract() != 0.0) {
        return Some(format!("Identifier {name} contains non-integer values"));
    }
    let ids: Vec<i64> = values.iter().map(|v| *v as i64).collect();

    let distinct: BTreeSet<i64> = ids.iter().copied().collect();
    let duplicates = n - distinct.len();
    if duplicates > 0 {
        return Some(format!(
            "Identifier {name} contains {duplicates} duplicate value(s)"
        ));
    }

    let start = column.start_or_default();
    let min = distinct.first().copied().unwrap_or(start);
    let max = distinct.last().copied().unwrap_or(start);
    if min != start {
        return Some(format!("Identifier {name} does not start from {start}"));
    }
    let last = i64::try_from(n - 1)
        .ok()
        .and_then(|offset| start.checked_add(offset));
    match last {
        None => Some(format!(
            "Identifier {name} cannot number {n} rows from {start}"
        )),
        Some(last) if max != last => Some(format!("Identifier {name} is not continuous")),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthlab_core::Column;

    fn definition() -> SchemaDefinition {
        SchemaDefinition::new(
            1,
            vec![
                ColumnDefinition::identifier("id", 1),
                ColumnDefinition::int("age", 18, 90),
                ColumnDefinition::categorical("city", ["RJ", "SP"]),
            ],
        )
    }

    fn ids(values: &[f64]) -> Column {
        Column::numeric("id", values.iter().copied().map(Some).collect())
    }

    #[test]
    fn clean_table_passes() {
        let table = Table::new(vec![
            ids(&[1.0, 2.0, 3.0]),
            Column::numeric("age", vec![Some(18.0), None, Some(90.0)]),
            Column::categorical("city", vec![Some("RJ".into()), Some("SP".into()), None]),
        ])
        .expect("table");
        let result = evaluate_schema_consistency(&definition(), &table);
        assert!(result.is_pass());
        assert_eq!(result.type_consistency, "All columns match declared types");
        assert_eq!(result.null_rate["age"], 1.0 / 3.0);
        assert_eq!(result.null_rate["id"], 0.0);
        assert_eq!(result.identifier_issues, None);
    }

    #[test]
    fn counts_violations() {
        let table = Table::new(vec![
            ids(&[1.0, 2.0, 3.0]),
            Column::numeric("age", vec![Some(17.0), Some(91.0), Some(40.0)]),
            Column::categorical("city", vec![Some("BH".into()), Some("SP".into()), Some("XX".into())]),
        ])
        .expect("table");
        let result = evaluate_schema_consistency(&definition(), &table);
        assert_eq!(result.schema_validity, SchemaValidity::Fail);
        assert_eq!(result.range_violations, 2);
        assert_eq!(result.category_violations, 2);
    }

    #[test]
    fn reports_duplicate_identifiers() {
        let table = Table::new(vec![
            ids(&[1.0, 2.0, 2.0, 2.0]),
            Column::numeric("age", vec![Some(20.0); 4]),
            Column::categorical("city", vec![Some("RJ".into()); 4]),
        ])
        .expect("table");
        let result = evaluate_schema_consistency(&definition(), &table);
        assert_eq!(
            result.identifier_issues.as_deref(),
            Some("Identifier id contains 2 duplicate value(s)")
        );
        assert!(!result.is_pass());
    }

    #[test]
    fn identifier_start_and_gaps() {
        let gapped = Table::new(vec![ids(&[1.0, 2.0, 4.0])]).expect("table");
        let shifted = Table::new(vec![ids(&[2.0, 3.0, 4.0])]).expect("table");
        let def = SchemaDefinition::new(1, vec![ColumnDefinition::identifier("id", 1)]);
        assert_eq!(
            evaluate_schema_consistency(&def, &gapped).identifier_issues.as_deref(),
            Some("Identifier id is not continuous")
        );
        assert_eq!(
            evaluate_schema_consistency(&def, &shifted).identifier_issues.as_deref(),
            Some("Identifier id does not start from 1")
        );
    }

    #[test]
    fn identifiers_at_i64_edges_are_reported_not_panicking() {
        let def = SchemaDefinition::new(1, vec![ColumnDefinition::identifier("id", i64::MAX)]);
        let single = Table::new(vec![ids(&[i64::MAX as f64])]).expect("table");
        assert_eq!(evaluate_schema_consistency(&def, &single).identifier_issues, None);

        let saturated = Table::new(vec![ids(&[i64::MAX as f64, 9.3e18])]).expect("table");
        assert_eq!(
            evaluate_schema_consistency(&def, &saturated).identifier_issues.as_deref(),
            Some("Identifier id contains 1 duplicate value(s)")
        );

        let low = SchemaDefinition::new(1, vec![ColumnDefinition::identifier("id", i64::MIN)]);
        let spread = Table::new(vec![ids(&[i64::MIN as f64, i64::MIN as f64 + 4096.0])]).expect("table");
        assert_eq!(
            evaluate_schema_consistency(&low, &spread).identifier_issues.as_deref(),
            Some("Identifier id is not continuous")
        );
    }

    #[test]
    fn type_issues_fail_the_check() {
        let table = Table::new(vec![
            ids(&[1.0, 2.0]),
            Column::numeric("age", vec![Some(20.5), Some(30.0)]),
        ])
        .expect("table");
        let result = evaluate_schema_consistency(&definition(), &table);
        assert_eq!(
            result.type_consistency,
            "Column age is not integer; Missing column: city"
        );
        assert_eq!(result.range_violations, 0);
        assert_eq!(result.schema_validity, SchemaValidity::Fail);
    }
}
