use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use synthlab_core::{AdversarialConfig, ColumnData, ColumnInfo, Schema, Table};

use crate::errors::EvalError;
use crate::forest::{ForestParams, RandomForest, TrainingBudget};
use crate::model::{AdversarialResult, AucBand};
use crate::stats::roc_auc;

/// Encoded rows of both tables; real rows are labelled `true`.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<bool>,
}

/// Train a real-vs-synthetic classifier and score it by ROC AUC on a held-out split.
///
/// Fails with [`EvalError::InsufficientData`] when either table has no rows or
/// no comparable non-identifier column, and with [`EvalError::Timeout`] when
/// training exceeds `config.timeout_ms`.
pub fn evaluate_adversarial(
    real: &Table,
    synthetic: &Table,
    schema: &Schema,
    config: &AdversarialConfig,
    cancel: &CancellationToken,
) -> Result<AdversarialResult, EvalError> {
    if real.row_count() == 0 || synthetic.row_count() == 0 {
        return Err(EvalError::InsufficientData(format!(
            "adversarial scoring needs rows on both sides (real={}, synthetic={})",
            real.row_count(),
            synthetic.row_count()
        )));
    }

    let features = encode_features(real, synthetic, schema);
    if features.names.is_empty() {
        return Err(EvalError::InsufficientData(
            "no non-identifier columns shared by both tables".to_string(),
        ));
    }

    let (train, test) = grouped_stratified_split(
        &features.rows,
        &features.labels,
        config.test_fraction,
        config.seed,
    );
    if train.is_empty() {
        return Err(EvalError::InsufficientData(
            "too few rows to hold out a test split".to_string(),
        ));
    }

    let train_x: Vec<Vec<f64>> = train.iter().map(|&i| features.rows[i].clone()).collect();
    let train_y: Vec<bool> = train.iter().map(|&i| features.labels[i]).collect();
    let params = ForestParams {
        n_estimators: config.n_estimators,
        max_depth: config.max_depth,
        min_samples_split: config.min_samples_split,
        seed: config.seed,
    };
    let budget = TrainingBudget {
        deadline: config.timeout().map(deadline),
        cancel: cancel.clone(),
    };

    let started = Instant::now();
    let forest = RandomForest::fit(&train_x, &train_y, &params, &budget)?;
    debug!(
        trees = forest.len(),
        train_rows = train.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "classifier trained"
    );

    let scores: Vec<f64> = test
        .iter()
        .map(|&i| forest.predict_proba(&features.rows[i]))
        .collect();
    let test_labels: Vec<bool> = test.iter().map(|&i| features.labels[i]).collect();
    let auc = roc_auc(&scores, &test_labels).ok_or_else(|| {
        EvalError::InsufficientData("test split does not contain both classes".to_string())
    })?;

    let band = AucBand::from_auc(auc);
    info!(
        auc,
        band = band.as_str(),
        features = features.names.len(),
        test_rows = test.len(),
        "adversarial evaluation finished"
    );

    Ok(AdversarialResult {
        auc,
        band,
        features: features.names.len(),
        train_rows: train.len(),
        test_rows: test.len(),
        trees: forest.len(),
    })
}

fn deadline(timeout: Duration) -> (Instant, u64) {
    (Instant::now() + timeout, timeout.as_millis() as u64)
}

/// Encode both tables into one labelled numeric matrix.
///
/// Numeric columns pass through with nulls imputed by the combined mean.
/// Categorical columns are one-hot encoded over the sorted union of observed
/// labels; a null encodes as all zeros.
pub fn encode_features(real: &Table, synthetic: &Table, schema: &Schema) -> FeatureMatrix {
    let n_real = real.row_count();
    let n_rows = n_real + synthetic.row_count();
    let mut names = Vec::new();
    let mut rows: Vec<Vec<f64>> = vec![Vec::new(); n_rows];

    for info in schema.trainable_columns() {
        let (Some(r), Some(s)) = (real.column(&info.name), synthetic.column(&info.name)) else {
            continue;
        };
        if info.is_numeric() {
            encode_numeric(info, &r.data, &s.data, &mut names, &mut rows);
        } else {
            encode_categorical(info, &r.data, &s.data, &mut names, &mut rows);
        }
    }

    let labels = (0..n_rows).map(|row| row < n_real).collect();
    FeatureMatrix {
        names,
        rows,
        labels,
    }
}

fn numeric_cell(data: &ColumnData, row: usize) -> Option<f64> {
    match data {
        ColumnData::Numeric(values) => values.get(row).copied().flatten(),
        ColumnData::Categorical(values) => values
            .get(row)?
            .as_deref()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
    }
}

fn encode_numeric(
    info: &ColumnInfo,
    real: &ColumnData,
    synthetic: &ColumnData,
    names: &mut Vec<String>,
    rows: &mut [Vec<f64>],
) {
    let cells: Vec<Option<f64>> = (0..real.len())
        .map(|row| numeric_cell(real, row))
        .chain((0..synthetic.len()).map(|row| numeric_cell(synthetic, row)))
        .collect();
    let observed: Vec<f64> = cells.iter().flatten().copied().collect();
    let mean = if observed.is_empty() {
        0.0
    } else {
        observed.iter().sum::<f64>() / observed.len() as f64
    };

    names.push(info.name.clone());
    for (row, cell) in rows.iter_mut().zip(cells) {
        row.push(cell.unwrap_or(mean));
    }
}

fn encode_categorical(
    info: &ColumnInfo,
    real: &ColumnData,
    synthetic: &ColumnData,
    names: &mut Vec<String>,
    rows: &mut [Vec<f64>],
) {
    let labels: Vec<Option<String>> = real.labels().into_iter().chain(synthetic.labels()).collect();
    let categories: BTreeSet<&str> = labels.iter().flatten().map(String::as_str).collect();
    let positions: BTreeMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(idx, category)| (*category, idx))
        .collect();

    names.extend(
        categories
            .iter()
            .map(|category| format!("{}={}", info.name, category)),
    );
    for (row, label) in rows.iter_mut().zip(&labels) {
        let mut one_hot = vec![0.0; categories.len()];
        if let Some(pos) = label.as_deref().and_then(|l| positions.get(l)) {
            one_hot[*pos] = 1.0;
        }
        row.extend(one_hot);
    }
}

/// Stratified split that keeps identical feature vectors on the same side.
///
/// Groups of identical rows are visited in seeded random order and moved to
/// the test side while each label stays within its target share. If a label
/// ends up absent from the test side, rows of that label are moved over
/// individually. Returns `(train, test)` row indices in ascending order.
pub fn grouped_stratified_split(
    rows: &[Vec<f64>],
    labels: &[bool],
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut groups: BTreeMap<Vec<u64>, Vec<usize>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let key = row.iter().map(|v| (v + 0.0).to_bits()).collect();
        groups.entry(key).or_default().push(idx);
    }
    let mut groups: Vec<Vec<usize>> = groups.into_values().collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    groups.shuffle(&mut rng);

    let total_pos = labels.iter().filter(|&&l| l).count();
    let total_neg = labels.len() - total_pos;
    let target = |n: usize| ((n as f64 * test_fraction).round() as usize).clamp(1, n.max(1));
    let (target_pos, target_neg) = (target(total_pos), target(total_neg));

    let mut in_test = vec![false; rows.len()];
    let (mut test_pos, mut test_neg) = (0, 0);
    for group in &groups {
        let pos = group.iter().filter(|&&i| labels[i]).count();
        let neg = group.len() - pos;
        if test_pos + pos <= target_pos && test_neg + neg <= target_neg {
            for &i in group {
                in_test[i] = true;
            }
            test_pos += pos;
            test_neg += neg;
        }
    }

    for (class, have, want) in [(true, test_pos, target_pos), (false, test_neg, target_neg)] {
        if have > 0 {
            continue;
        }
        let mut moved = 0;
        for &i in groups.iter().flatten() {
            if moved == want {
                break;
            }
            if !in_test[i] && labels[i] == class {
                in_test[i] = true;
                moved += 1;
            }
        }
    }

    (0..rows.len()).partition(|&i| !in_test[i])
}
