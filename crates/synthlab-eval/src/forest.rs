//! Bagged CART classifier used by the adversarial evaluator.

use std::time::Instant;

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio_util::sync::CancellationToken;

use crate::errors::EvalError;

/// Forest hyper-parameters.
#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

/// Limits checked between trees.
#[derive(Debug, Clone, Default)]
pub struct TrainingBudget {
    pub deadline: Option<(Instant, u64)>,
    pub cancel: CancellationToken,
}

impl TrainingBudget {
    fn check(&self) -> Result<(), EvalError> {
        if self.cancel.is_cancelled() {
            return Err(EvalError::Cancelled);
        }
        if let Some((deadline, budget_ms)) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(EvalError::Timeout { budget_ms });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single decision tree stored as an arena of nodes; node 0 is the root.
#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Random forest of bootstrap-bagged Gini trees with √p features per node.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn fit(
        x: &[Vec<f64>],
        y: &[bool],
        params: &ForestParams,
        budget: &TrainingBudget,
    ) -> Result<Self, EvalError> {
        let n = x.len();
        if n == 0 {
            return Err(EvalError::InsufficientData(
                "no training rows for the classifier".to_string(),
            ));
        }
        let n_features = x[0].len();
        let max_features = ((n_features as f64).sqrt() as usize).clamp(1, n_features.max(1));

        let mut trees = Vec::with_capacity(params.n_estimators);
        for tree_idx in 0..params.n_estimators {
            budget.check()?;
            let mut rng = ChaCha8Rng::seed_from_u64(tree_seed(params.seed, tree_idx as u64));
            let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let builder = TreeBuilder {
                x,
                y,
                n_features,
                max_features,
                max_depth: params.max_depth,
                min_samples_split: params.min_samples_split.max(2),
            };
            trees.push(builder.build(sample, &mut rng));
        }
        Ok(Self { trees })
    }

    /// Mean leaf positive fraction across trees.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [bool],
    n_features: usize,
    max_features: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl TreeBuilder<'_> {
    fn build(&self, sample: Vec<usize>, rng: &mut ChaCha8Rng) -> Tree {
        let mut nodes = vec![Node::Leaf { positive: 0.0 }];
        let mut stack = vec![(0usize, sample, 0usize)];

        while let Some((node_idx, rows, depth)) = stack.pop() {
            let positives = rows.iter().filter(|&&row| self.y[row]).count();
            let positive = positives as f64 / rows.len().max(1) as f64;

            let pure = positives == 0 || positives == rows.len();
            let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
            if pure || depth_reached || rows.len() < self.min_samples_split {
                nodes[node_idx] = Node::Leaf { positive };
                continue;
            }

            let Some(split) = self.best_split(&rows, rng) else {
                nodes[node_idx] = Node::Leaf { positive };
                continue;
            };
            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&row| self.x[row][split.feature] <= split.threshold);
            if left_rows.is_empty() || right_rows.is_empty() {
                nodes[node_idx] = Node::Leaf { positive };
                continue;
            }

            let left = nodes.len();
            nodes.push(Node::Leaf { positive: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { positive: 0.0 });
            nodes[node_idx] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            stack.push((left, left_rows, depth + 1));
            stack.push((right, right_rows, depth + 1));
        }

        Tree { nodes }
    }

    fn best_split(&self, rows: &[usize], rng: &mut ChaCha8Rng) -> Option<BestSplit> {
        if self.n_features == 0 || rows.len() < 2 {
            return None;
        }
        let n = rows.len() as f64;
        let total_pos = rows.iter().filter(|&&row| self.y[row]).count() as f64;
        let mut best: Option<BestSplit> = None;
        let mut sorted = rows.to_vec();

        for feature in index::sample(rng, self.n_features, self.max_features) {
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left_pos = 0.0;
            for i in 0..sorted.len() - 1 {
                if self.y[sorted[i]] {
                    left_pos += 1.0;
                }
                let here = self.x[sorted[i]][feature];
                let next = self.x[sorted[i + 1]][feature];
                if here == next {
                    continue;
                }
                let left_n = (i + 1) as f64;
                let right_n = n - left_n;
                let right_pos = total_pos - left_pos;
                let impurity =
                    (left_n * gini(left_pos, left_n) + right_n * gini(right_pos, right_n)) / n;
                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    best = Some(BestSplit {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

fn gini(positives: f64, n: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let p = positives / n;
    2.0 * p * (1.0 - p)
}

fn tree_seed(seed: u64, tree_idx: u64) -> u64 {
    let mut hash = seed ^ tree_idx.wrapping_mul(0x9e3779b97f4a7c15);
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n_estimators: usize) -> ForestParams {
        ForestParams {
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            seed: 42,
        }
    }

    #[test]
    fn separates_a_threshold_concept() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y: Vec<bool> = (0..40).map(|i| i >= 20).collect();
        let forest = RandomForest::fit(&x, &y, &params(25), &TrainingBudget::default())
            .expect("fit");
        assert_eq!(forest.len(), 25);
        assert!(forest.predict_proba(&[35.0, 1.0]) > 0.8);
        assert!(forest.predict_proba(&[3.0, 1.0]) < 0.2);
    }

    #[test]
    fn identical_features_give_constant_scores() {
        let x = vec![vec![1.0, 2.0]; 10];
        let y: Vec<bool> = (0..10).map(|i| i % 2 == 0).collect();
        let forest =
            RandomForest::fit(&x, &y, &params(5), &TrainingBudget::default()).expect("fit");
        let score = forest.predict_proba(&[1.0, 2.0]);
        assert!((0.0..=1.0).contains(&score));
        assert_eq!(score, forest.predict_proba(&[1.0, 2.0]));
    }

    #[test]
    fn cancelled_budget_stops_training() {
        let budget = TrainingBudget::default();
        budget.cancel.cancel();
        let x = vec![vec![0.0], vec![1.0]];
        let err = RandomForest::fit(&x, &[true, false], &params(3), &budget).expect_err("cancel");
        assert!(matches!(err, EvalError::Cancelled));
    }

    #[test]
    fn expired_deadline_times_out() {
        let budget = TrainingBudget {
            deadline: Some((Instant::now(), 0)),
            cancel: CancellationToken::new(),
        };
        let x = vec![vec![0.0], vec![1.0]];
        let err = RandomForest::fit(&x, &[true, false], &params(3), &budget).expect_err("timeout");
        assert!(matches!(err, EvalError::Timeout { budget_ms: 0 }));
    }
}
