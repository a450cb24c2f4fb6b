//! Bagged ensemble of regression trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tree::{RegressionTree, TreeParams};
use super::{Regressor, Row};

/// Random forest regressor: bootstrap samples, fully considered features,
/// prediction is the mean over trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `n_estimators` trees on bootstrap samples drawn from `seed`.
    pub fn fit(
        rows: &[Row],
        targets: &[f64],
        n_estimators: usize,
        max_depth: Option<usize>,
        seed: u64,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = rows.len();
        let params = TreeParams {
            max_depth,
            ..Default::default()
        };

        let trees = (0..n_estimators.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(rows, targets, &sample, params)
            })
            .collect();

        Self { trees }
    }

    /// Number of trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether the forest has no trees.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Regressor for RandomForest {
    fn predict_row(&self, row: &Row) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict_row(row)).sum::<f64>() / self.trees.len() as f64
    }
}
