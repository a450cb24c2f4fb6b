//! Gradient boosted regression trees with squared loss.

use super::tree::{RegressionTree, TreeParams};
use super::{Regressor, Row};

/// Gradient boosting regressor.
///
/// Starts from the target mean; each stage fits a shallow tree to the
/// current residuals and adds it scaled by the learning rate.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBoosting {
    init: f64,
    learning_rate: f64,
    stages: Vec<RegressionTree>,
}

impl GradientBoosting {
    /// Fit `n_estimators` stages of depth `max_depth`.
    pub fn fit(
        rows: &[Row],
        targets: &[f64],
        n_estimators: usize,
        learning_rate: f64,
        max_depth: usize,
    ) -> Self {
        let init = if targets.is_empty() {
            0.0
        } else {
            targets.iter().sum::<f64>() / targets.len() as f64
        };
        let params = TreeParams {
            max_depth: Some(max_depth),
            ..Default::default()
        };
        let all: Vec<usize> = (0..rows.len()).collect();

        let mut current = vec![init; targets.len()];
        let mut stages = Vec::with_capacity(n_estimators);
        for _ in 0..n_estimators {
            let residuals: Vec<f64> = targets.iter().zip(&current).map(|(y, f)| y - f).collect();
            let tree = RegressionTree::fit(rows, &residuals, &all, params);
            for (f, row) in current.iter_mut().zip(rows) {
                *f += learning_rate * tree.predict_row(row);
            }
            stages.push(tree);
        }

        Self {
            init,
            learning_rate,
            stages,
        }
    }

    /// Number of boosting stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl Regressor for GradientBoosting {
    fn predict_row(&self, row: &Row) -> f64 {
        self.init
            + self
                .stages
                .iter()
                .map(|t| self.learning_rate * t.predict_row(row))
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::mse;
    use goalcast_core::FEATURE_COUNT;

    #[test]
    fn test_more_stages_reduce_training_error() {
        let rows: Vec<Row> = (0..30)
            .map(|i| {
                let mut r = [0.0; FEATURE_COUNT];
                r[0] = i as f64;
                r
            })
            .collect();
        let y: Vec<f64> = (0..30).map(|i| 50.0 + 13.8 * i as f64).collect();

        let predict = |model: &GradientBoosting| -> Vec<f64> {
            rows.iter().map(|r| model.predict_row(r)).collect()
        };
        let few = GradientBoosting::fit(&rows, &y, 5, 0.1, 3);
        let many = GradientBoosting::fit(&rows, &y, 100, 0.1, 3);

        assert_eq!(many.stage_count(), 100);
        assert!(mse(&y, &predict(&many)) < mse(&y, &predict(&few)));
    }

    #[test]
    fn test_no_stages_predicts_mean() {
        let rows = vec![[0.0; FEATURE_COUNT], [1.0; FEATURE_COUNT]];
        let model = GradientBoosting::fit(&rows, &[2.0, 4.0], 0, 0.1, 3);
        assert_eq!(model.predict_row(&rows[0]), 3.0);
    }
}
