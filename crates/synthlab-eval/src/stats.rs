//! Numerical kernels: two-sample KS, chi-square homogeneity, Pearson
//! correlation and ROC AUC.

use serde::{Deserialize, Serialize};

const GAMMA_ITMAX: usize = 500;
const GAMMA_EPS: f64 = 1e-14;
const FPMIN: f64 = 1e-300;

/// Statistic and p-value of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sided two-sample Kolmogorov–Smirnov test.
///
/// Returns `None` when either sample is empty. The p-value uses the asymptotic
/// Kolmogorov distribution with Stephens' effective-size correction.
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> Option<TestStatistic> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n, m) = (a.len(), b.len());
    let (nf, mf) = (n as f64, m as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < n && j < m {
        let value = a[i].min(b[j]);
        while i < n && a[i] <= value {
            i += 1;
        }
        while j < m && b[j] <= value {
            j += 1;
        }
        d = d.max((i as f64 / nf - j as f64 / mf).abs());
    }

    let ne = (nf * mf / (nf + mf)).sqrt();
    let lambda = (ne + 0.12 + 0.11 / ne) * d;
    Some(TestStatistic {
        statistic: d,
        p_value: kolmogorov_q(lambda),
    })
}

/// Survival function of the Kolmogorov distribution, `P(K > z)`.
pub fn kolmogorov_q(z: f64) -> f64 {
    if z <= 0.0 {
        return 1.0;
    }
    let p = if z < 1.18 {
        let y = (-1.233_700_550_136_169_8 / (z * z)).exp();
        let cdf = 2.256_758_334_191_025 * (-y.ln()).sqrt()
            * (y + y.powi(9) + y.powi(25) + y.powi(49));
        1.0 - cdf
    } else {
        let x = (-2.0 * z * z).exp();
        2.0 * (x - x.powi(4) + x.powi(9))
    };
    p.clamp(0.0, 1.0)
}

/// Chi-square test of homogeneity on a 2×K table of observed counts.
///
/// Yates' continuity correction applies when K = 2. Fewer than two categories
/// give a statistic of 0 and a p-value of 1. Both rows must have a positive
/// total.
pub fn chi_square_homogeneity(real: &[u64], synthetic: &[u64]) -> TestStatistic {
    let k = real.len().min(synthetic.len());
    if k < 2 {
        return TestStatistic {
            statistic: 0.0,
            p_value: 1.0,
        };
    }

    let rows = [&real[..k], &synthetic[..k]];
    let row_totals: Vec<f64> = rows
        .iter()
        .map(|row| row.iter().map(|&c| c as f64).sum())
        .collect();
    let col_totals: Vec<f64> = (0..k).map(|j| (real[j] + synthetic[j]) as f64).collect();
    let total: f64 = row_totals.iter().sum();
    let yates = k == 2;

    let mut statistic = 0.0;
    for (r, row) in rows.iter().enumerate() {
        for j in 0..k {
            let expected = row_totals[r] * col_totals[j] / total;
            if expected <= 0.0 {
                continue;
            }
            let mut observed = row[j] as f64;
            if yates {
                let diff = expected - observed;
                observed += diff.signum() * diff.abs().min(0.5);
            }
            statistic += (observed - expected).powi(2) / expected;
        }
    }

    let dof = (k - 1) as f64;
    TestStatistic {
        statistic,
        p_value: gamma_q(dof / 2.0, statistic / 2.0).clamp(0.0, 1.0),
    }
}

/// Regularized upper incomplete gamma function `Q(a, x)`.
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 || a <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - gamma_series(a, x)
    } else {
        gamma_continued_fraction(a, x)
    }
}

fn gamma_series(a: f64, x: f64) -> f64 {
    let mut ap = a;
    let mut sum = 1.0 / a;
    let mut del = sum;
    for _ in 0..GAMMA_ITMAX {
        ap += 1.0;
        del *= x / ap;
        sum += del;
        if del.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

fn gamma_continued_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=GAMMA_ITMAX {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = b + an / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Natural log of the gamma function (Lanczos approximation), `x > 0`.
pub fn ln_gamma(x: f64) -> f64 {
    const COF: [f64; 6] = [
        76.180_091_729_471_46,
        -86.505_320_329_416_77,
        24.014_098_240_830_91,
        -1.231_739_572_450_155,
        0.001_208_650_973_866_179,
        -0.000_005_395_239_384_953,
    ];
    let mut y = x;
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000_000_000_190_015;
    for coefficient in COF {
        y += 1.0;
        ser += coefficient / y;
    }
    -tmp + (2.506_628_274_631_000_5 * ser / x).ln()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Zero variance or fewer than two shared observations give 0.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return 0.0;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return 0.0;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric correlation matrix with unit diagonal.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![0.0; k]; k];
    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let r = pearson(&columns[i], &columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Mean squared element-wise difference over all cells of two square matrices.
pub fn matrix_mse(a: &[Vec<f64>], b: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut cells = 0usize;
    for (row_a, row_b) in a.iter().zip(b) {
        for (x, y) in row_a.iter().zip(row_b) {
            sum += (x - y).powi(2);
            cells += 1;
        }
    }
    if cells == 0 { 0.0 } else { sum / cells as f64 }
}

/// Area under the ROC curve via the Mann–Whitney U statistic with mid-ranks.
///
/// Returns `None` unless both classes are present.
pub fn roc_auc(scores: &[f64], labels: &[bool]) -> Option<f64> {
    let n = scores.len().min(labels.len());
    let positives = labels[..n].iter().filter(|&&label| label).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| scores[i].total_cmp(&scores[j]));

    let mut rank_sum = 0.0;
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }
        // ranks are 1-based; ties share the average rank
        let mid_rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            if labels[idx] {
                rank_sum += mid_rank;
            }
        }
        start = end + 1;
    }

    let p = positives as f64;
    let u = rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn ks_identical_samples() {
        let sample: Vec<f64> = (0..50).map(|i| (i * 7 % 13) as f64).collect();
        let result = ks_two_sample(&sample, &sample).expect("ks");
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn ks_statistic_with_overlap() {
        let result = ks_two_sample(&[1.0, 2.0, 3.0, 4.0], &[3.0, 4.0, 5.0, 6.0]).expect("ks");
        assert!(close(result.statistic, 0.5, 1e-12));
    }

    #[test]
    fn ks_disjoint_samples_reject() {
        let a: Vec<f64> = (1..=10).map(f64::from).collect();
        let b: Vec<f64> = (11..=20).map(f64::from).collect();
        let result = ks_two_sample(&a, &b).expect("ks");
        assert_eq!(result.statistic, 1.0);
        assert!(result.p_value < 0.001);
    }

    #[test]
    fn ks_empty_side_is_none() {
        assert!(ks_two_sample(&[], &[1.0]).is_none());
        assert!(ks_two_sample(&[1.0], &[]).is_none());
    }

    #[test]
    fn kolmogorov_reference_values() {
        assert!(close(kolmogorov_q(0.5), 0.9639, 1e-3));
        assert!(close(kolmogorov_q(1.0), 0.2700, 1e-3));
        assert!(close(kolmogorov_q(1.36), 0.0494, 1e-3));
        assert_eq!(kolmogorov_q(0.0), 1.0);
    }

    #[test]
    fn gamma_q_matches_closed_forms() {
        // dof 2: Q(1, x) = exp(-x)
        assert!(close(gamma_q(1.0, 1.0), (-1.0f64).exp(), 1e-10));
        assert!(close(gamma_q(1.0, 5.0), (-5.0f64).exp(), 1e-10));
        // dof 1 critical value at alpha 0.05
        assert!(close(gamma_q(0.5, 3.841_459 / 2.0), 0.05, 1e-5));
        assert_eq!(gamma_q(2.0, 0.0), 1.0);
    }

    #[test]
    fn chi_square_identical_counts() {
        let result = chi_square_homogeneity(&[10, 20, 30], &[10, 20, 30]);
        assert!(close(result.statistic, 0.0, 1e-12));
        assert!(close(result.p_value, 1.0, 1e-12));
    }

    #[test]
    fn chi_square_three_categories() {
        // expected counts are 15 each; statistic = 4 * 25 / 15
        let result = chi_square_homogeneity(&[20, 15, 10], &[10, 15, 20]);
        assert!(close(result.statistic, 20.0 / 3.0, 1e-9));
        assert!(close(result.p_value, (-10.0f64 / 3.0).exp(), 1e-9));
    }

    #[test]
    fn chi_square_applies_yates_for_two_categories() {
        // |o - e| = 5 is reduced to 4.5 in each of the four cells
        let result = chi_square_homogeneity(&[15, 5], &[5, 15]);
        assert!(close(result.statistic, 4.0 * 4.5 * 4.5 / 10.0, 1e-9));
    }

    #[test]
    fn chi_square_single_category() {
        let result = chi_square_homogeneity(&[5], &[9]);
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn pearson_edge_cases() {
        let x: Vec<Option<f64>> = (0..5).map(|i| Some(i as f64)).collect();
        let y: Vec<Option<f64>> = (0..5).map(|i| Some(10.0 - 2.0 * i as f64)).collect();
        let flat = vec![Some(3.0); 5];
        assert!(close(pearson(&x, &x), 1.0, 1e-12));
        assert!(close(pearson(&x, &y), -1.0, 1e-12));
        assert_eq!(pearson(&x, &flat), 0.0);

        let gappy = vec![Some(1.0), None, Some(3.0), Some(4.0), None];
        assert!(close(pearson(&x, &gappy), 1.0, 1e-12));
    }

    #[test]
    fn correlation_matrix_is_symmetric() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(3.0), Some(5.0)],
            vec![Some(2.0), Some(1.0), Some(4.0), Some(3.0)],
            vec![Some(9.0), Some(7.0), Some(4.0), Some(1.0)],
        ];
        let matrix = correlation_matrix(&columns);
        for i in 0..3 {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(matrix[i][j], matrix[j][i]);
            }
        }
        assert_eq!(matrix_mse(&matrix, &matrix), 0.0);
    }

    #[test]
    fn matrix_mse_averages_all_cells() {
        let a = vec![vec![1.0, 0.5], vec![0.5, 1.0]];
        let b = vec![vec![1.0, -0.5], vec![-0.5, 1.0]];
        assert!(close(matrix_mse(&a, &b), 0.5, 1e-12));
    }

    #[test]
    fn auc_reference_values() {
        let labels = [false, false, true, true];
        assert_eq!(roc_auc(&[0.1, 0.4, 0.35, 0.8], &labels), Some(0.75));
        assert_eq!(roc_auc(&[0.1, 0.2, 0.8, 0.9], &labels), Some(1.0));
        assert_eq!(roc_auc(&[0.9, 0.8, 0.2, 0.1], &labels), Some(0.0));
        assert_eq!(roc_auc(&[0.5; 4], &labels), Some(0.5));
        assert_eq!(roc_auc(&[0.1, 0.2], &[true, true]), None);
    }
}
