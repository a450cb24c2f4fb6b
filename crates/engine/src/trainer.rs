//! Model training: split, scale, fit, score and select.

use std::collections::BTreeMap;

use goalcast_core::{FeatureVector, GoalConfig, ModelKind, ProgressObservation, Time};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::features::build_features;
use crate::models::metrics::{mse, r_squared};
use crate::models::{FittedModel, Regressor, Row};
use crate::scaler::StandardScaler;

/// A fitted model with its held-out scores.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    /// Model family
    pub kind: ModelKind,
    /// Fitted model
    pub model: FittedModel,
    /// Held-out R²
    pub r2: f64,
    /// Held-out mean squared error
    pub mse: f64,
}

/// Everything produced by one training run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedSet {
    /// Fitted models by kind
    pub models: BTreeMap<ModelKind, TrainedModel>,
    /// Highest scoring kind
    pub best_model: ModelKind,
    /// Scaler fitted on the training split
    pub scaler: StandardScaler,
    /// Number of observations used
    pub samples: usize,
    /// When training finished
    pub trained_at: Time,
}

/// Scores of one model in a [`TrainingReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelScore {
    /// Held-out R²
    pub r2: f64,
    /// Held-out mean squared error
    pub mse: f64,
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    /// Observations used
    pub samples: usize,
    /// Rows in the training split
    pub train_size: usize,
    /// Rows in the held-out split
    pub test_size: usize,
    /// Selected model
    pub best_model: ModelKind,
    /// Scores per model
    pub scores: BTreeMap<ModelKind, ModelScore>,
    /// When training finished
    pub trained_at: Time,
}

impl TrainedSet {
    /// Held-out R² per model.
    pub fn r2_scores(&self) -> BTreeMap<ModelKind, f64> {
        self.models.iter().map(|(k, m)| (*k, m.r2)).collect()
    }

    /// The best model.
    pub fn best(&self) -> Option<&TrainedModel> {
        self.models.get(&self.best_model)
    }

    fn report(&self, train_size: usize, test_size: usize) -> TrainingReport {
        TrainingReport {
            samples: self.samples,
            train_size,
            test_size,
            best_model: self.best_model,
            scores: self
                .models
                .iter()
                .map(|(k, m)| (*k, ModelScore { r2: m.r2, mse: m.mse }))
                .collect(),
            trained_at: self.trained_at,
        }
    }
}

/// Train every model family on `series`, stamping the result with `trained_at`.
pub fn train_models(
    series: &[ProgressObservation],
    goal: &GoalConfig,
    config: &EngineConfig,
    trained_at: Time,
) -> Result<(TrainedSet, TrainingReport)> {
    let required = config.min_training_samples.max(2);
    if series.len() < required {
        return Err(EngineError::InsufficientData {
            required,
            actual: series.len(),
        });
    }

    let features = build_features(series, goal);
    for fv in &features {
        fv.validate()?;
    }
    let rows: Vec<Row> = features.iter().map(FeatureVector::to_array).collect();
    let targets: Vec<f64> = series.iter().map(|o| o.progress_value).collect();
    if let Some(bad) = targets.iter().find(|v| !v.is_finite()) {
        return Err(EngineError::Numerical(format!("non-finite progress value {bad}")));
    }

    let (train_idx, test_idx) = split_indices(rows.len(), config.test_fraction, config.seed);
    let pick_rows = |idx: &[usize]| idx.iter().map(|&i| rows[i]).collect::<Vec<Row>>();
    let pick_targets = |idx: &[usize]| idx.iter().map(|&i| targets[i]).collect::<Vec<f64>>();

    let scaler = StandardScaler::fit(&pick_rows(&train_idx));
    let x_train = scaler.transform_all(&pick_rows(&train_idx));
    let x_test = scaler.transform_all(&pick_rows(&test_idx));
    let y_train = pick_targets(&train_idx);
    let y_test = pick_targets(&test_idx);
    debug!(train = x_train.len(), test = x_test.len(), "Split training data");

    let mut models = BTreeMap::new();
    for kind in ModelKind::ALL {
        let model = FittedModel::fit(kind, &x_train, &y_train, config)?;
        let predicted = model.predict(&x_test);
        let r2 = r_squared(&y_test, &predicted);
        let mse = mse(&y_test, &predicted);
        info!(model = %kind, r2, mse, "Model scored");
        models.insert(kind, TrainedModel { kind, model, r2, mse });
    }

    let best_model = select_best(&models)
        .ok_or_else(|| EngineError::Numerical("no model produced a score".to_string()))?;

    let set = TrainedSet {
        models,
        best_model,
        scaler,
        samples: series.len(),
        trained_at,
    };
    let report = set.report(x_train.len(), x_test.len());
    Ok((set, report))
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_fraction)` rows,
/// at least one and leaving at least one for training.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let fraction = if test_fraction.is_finite() { test_fraction.clamp(0.0, 1.0) } else { 0.0 };
    let n_test = ((n as f64 * fraction).ceil() as usize).clamp(1, n.saturating_sub(1).max(1));
    let train = idx.split_off(n_test.min(idx.len()));
    (train, idx)
}

/// Highest R² wins; ties keep the kind listed first in [`ModelKind::ALL`].
pub fn select_best(models: &BTreeMap<ModelKind, TrainedModel>) -> Option<ModelKind> {
    let mut best: Option<(ModelKind, f64)> = None;
    for kind in ModelKind::ALL {
        let Some(model) = models.get(&kind) else {
            continue;
        };
        let score = if model.r2.is_finite() { model.r2 } else { f64::NEG_INFINITY };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((kind, score)),
        }
    }
    best.map(|(kind, _)| kind)
}
