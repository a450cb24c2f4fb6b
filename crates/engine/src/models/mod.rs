//! Regression models.
//!
//! Each model family implements [`Regressor`]; [`FittedModel`] is the
//! closed set the trainer stores, keyed by [`ModelKind`].

mod boosting;
mod forest;
mod linear;
pub mod metrics;
mod tree;

pub use boosting::GradientBoosting;
pub use forest::RandomForest;
pub use linear::LinearModel;
pub use tree::{Node, RegressionTree, TreeParams};

use goalcast_core::{ModelKind, FEATURE_COUNT};

use crate::config::EngineConfig;
use crate::error::Result;

/// One standardized feature row.
pub type Row = [f64; FEATURE_COUNT];

/// A fitted model that maps a feature row to a progress value.
pub trait Regressor {
    /// Predict for a single row.
    fn predict_row(&self, row: &Row) -> f64;

    /// Predict for many rows.
    fn predict(&self, rows: &[Row]) -> Vec<f64> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}

/// A fitted model of any supported family.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedModel {
    /// Random forest
    RandomForest(RandomForest),
    /// Gradient boosting
    GradientBoosting(GradientBoosting),
    /// Linear regression
    Linear(LinearModel),
}

impl FittedModel {
    /// Fit a model of `kind` with the engine settings.
    pub fn fit(kind: ModelKind, rows: &[Row], targets: &[f64], config: &EngineConfig) -> Result<Self> {
        tracing::debug!(model = %kind, samples = rows.len(), "Fitting model");
        Ok(match kind {
            ModelKind::RandomForest => FittedModel::RandomForest(RandomForest::fit(
                rows,
                targets,
                config.n_estimators,
                config.forest_max_depth,
                config.seed,
            )),
            ModelKind::GradientBoosting => FittedModel::GradientBoosting(GradientBoosting::fit(
                rows,
                targets,
                config.n_estimators,
                config.learning_rate,
                config.boosting_max_depth,
            )),
            ModelKind::Linear => FittedModel::Linear(LinearModel::fit(rows, targets, config.ridge)?),
        })
    }

    /// Family of this model.
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::RandomForest(_) => ModelKind::RandomForest,
            FittedModel::GradientBoosting(_) => ModelKind::GradientBoosting,
            FittedModel::Linear(_) => ModelKind::Linear,
        }
    }
}

impl Regressor for FittedModel {
    fn predict_row(&self, row: &Row) -> f64 {
        match self {
            FittedModel::RandomForest(m) => m.predict_row(row),
            FittedModel::GradientBoosting(m) => m.predict_row(row),
            FittedModel::Linear(m) => m.predict_row(row),
        }
    }
}
