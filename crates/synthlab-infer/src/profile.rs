use std::collections::BTreeSet;

use synthlab_core::{ColumnData, format_number};

/// Raw observations about one column, before any classification.
#[derive(Debug, Clone)]
pub(crate) struct ColumnProfile {
    pub rows: usize,
    pub nulls: usize,
    /// Non-null values when every one of them is numeric.
    pub numeric: Option<Vec<f64>>,
    /// Distinct non-null labels, sorted lexicographically.
    pub distinct: BTreeSet<String>,
}

impl ColumnProfile {
    pub fn observe(data: &ColumnData) -> Self {
        let rows = data.len();
        let nulls = data.null_count();
        match data {
            ColumnData::Numeric(values) => {
                let observed: Vec<f64> = values.iter().flatten().copied().collect();
                let distinct = observed.iter().copied().map(format_number).collect();
                Self {
                    rows,
                    nulls,
                    numeric: Some(observed),
                    distinct,
                }
            }
            ColumnData::Categorical(values) => {
                let observed: Vec<&String> = values.iter().flatten().collect();
                let parsed: Option<Vec<f64>> = observed
                    .iter()
                    .map(|value| {
                        value
                            .trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|number| number.is_finite())
                    })
                    .collect();
                let distinct = match &parsed {
                    Some(numbers) => numbers.iter().copied().map(format_number).collect(),
                    None => observed.iter().map(|value| (*value).clone()).collect(),
                };
                Self {
                    rows,
                    nulls,
                    numeric: parsed,
                    distinct,
                }
            }
        }
    }

    pub fn non_null(&self) -> usize {
        self.rows - self.nulls
    }

    pub fn missing_rate(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.nulls as f64 / self.rows as f64
        }
    }

    pub fn all_null(&self) -> bool {
        self.non_null() == 0
    }

    pub fn all_whole(&self) -> bool {
        self.numeric
            .as_ref()
            .is_some_and(|values| values.iter().all(|value| value.fract() == 0.0))
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        let values = self.numeric.as_ref()?;
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value))))
    }

    pub fn unique_ratio(&self) -> f64 {
        if self.non_null() == 0 {
            0.0
        } else {
            self.distinct.len() as f64 / self.non_null() as f64
        }
    }
}
