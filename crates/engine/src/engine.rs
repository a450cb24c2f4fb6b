//! The shared prediction engine.

use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use goalcast_core::{CurrentState, GoalConfig, ModelKind, Prediction, ProgressObservation, Time};
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::predictor::predict_with;
use crate::trainer::{train_models, TrainedSet, TrainingReport};

/// Immutable view of the trained models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    /// Latest successful training, if any
    pub trained: Option<TrainedSet>,
}

impl EngineState {
    /// Whether models are available.
    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// Best model of the latest training.
    pub fn best_model(&self) -> Option<ModelKind> {
        self.trained.as_ref().map(|t| t.best_model)
    }
}

/// Owns the trained state and serves predictions.
///
/// Training builds a complete new [`EngineState`] and swaps it in; readers
/// clone the current snapshot and never observe a partial update.
pub struct PredictionEngine {
    goal: GoalConfig,
    config: EngineConfig,
    state: RwLock<Arc<EngineState>>,
}

impl PredictionEngine {
    /// Create an untrained engine for `goal`.
    pub fn new(goal: GoalConfig) -> Self {
        Self {
            goal,
            config: EngineConfig::default(),
            state: RwLock::new(Arc::new(EngineState::default())),
        }
    }

    /// Set the training configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Goal this engine predicts for.
    pub fn goal(&self) -> &GoalConfig {
        &self.goal
    }

    /// Training configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Train on `series`. Failures are logged and leave the previous state
    /// in place.
    pub fn train(&self, series: &[ProgressObservation], trained_at: Time) -> bool {
        match self.try_train(series, trained_at) {
            Ok(_) => true,
            Err(e) => {
                error!("Training failed: {}", e);
                false
            }
        }
    }

    /// Train on `series`, reporting why training was declined.
    pub fn try_train(&self, series: &[ProgressObservation], trained_at: Time) -> Result<TrainingReport> {
        info!("Training models on {} observations", series.len());
        let (set, report) = train_models(series, &self.goal, &self.config, trained_at)?;

        let next = Arc::new(EngineState { trained: Some(set) });
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = next;

        info!("Training complete, best model: {}", report.best_model);
        Ok(report)
    }

    /// Predict the final progress for `state` as of `as_of`.
    pub fn predict(&self, state: &CurrentState, as_of: NaiveDate) -> Prediction {
        let snapshot = self.snapshot();
        predict_with(snapshot.trained.as_ref(), state, &self.goal, as_of)
    }

    /// Whether models are trained.
    pub fn is_trained(&self) -> bool {
        self.snapshot().is_trained()
    }

    /// Best model of the latest training.
    pub fn best_model(&self) -> Option<ModelKind> {
        self.snapshot().best_model()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> Arc<EngineState> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use goalcast_core::{series_from_values, PredictionSource};

    fn series(days: usize) -> Vec<ProgressObservation> {
        let start = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
        let points: Vec<_> = (0..days)
            .map(|i| {
                let wobble = [0.0, 3.0, -2.0, 1.5, -1.0, 0.5, -2.5][i % 7];
                (
                    start + Duration::days(i as i64),
                    50.0 + 13.8 * i as f64 + wobble,
                    (i % 7 == 6) as u32,
                )
            })
            .collect();
        series_from_values(&points)
    }

    fn engine() -> PredictionEngine {
        PredictionEngine::new(GoalConfig::default()).with_config(EngineConfig {
            n_estimators: 20,
            ..Default::default()
        })
    }

    fn stamp() -> Time {
        chrono::Utc::now()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 20).unwrap()
    }

    #[test]
    fn test_short_histories_never_train() {
        let engine = engine();
        for n in [0, 1, 5, 19] {
            assert!(!engine.train(&series(n), stamp()));
            assert!(!engine.is_trained());
            assert_eq!(engine.best_model(), None);
        }
    }

    #[test]
    fn test_train_selects_known_kind() {
        let engine = engine();
        assert!(engine.train(&series(20), stamp()));
        assert!(engine.is_trained());
        assert!(ModelKind::ALL.contains(&engine.best_model().unwrap()));

        assert!(engine.train(&series(45), stamp()));
        assert_eq!(engine.snapshot().trained.as_ref().unwrap().samples, 45);
    }

    #[test]
    fn test_failed_training_keeps_previous_state() {
        let engine = engine();
        assert!(engine.train(&series(30), stamp()));
        let before = engine.snapshot();

        assert!(!engine.train(&series(3), stamp()));
        assert_eq!(*engine.snapshot(), *before);
    }

    #[test]
    fn test_non_finite_history_keeps_previous_state() {
        let engine = engine();
        assert!(engine.train(&series(30), stamp()));
        let before = engine.snapshot();

        let mut broken = series(30);
        broken[12].progress_value = f64::NAN;
        assert!(engine.try_train(&broken, stamp()).is_err());
        assert!(!engine.train(&broken, stamp()));
        assert!(engine.is_trained());
        assert_eq!(*engine.snapshot(), *before);
    }

    #[test]
    fn test_untrained_engine_uses_projection() {
        let engine = engine();
        let state = CurrentState {
            current_progress: 3500.0,
            days_elapsed: 254.0,
            ..Default::default()
        };
        let first = engine.predict(&state, as_of());
        let second = engine.predict(&state, as_of());
        assert_eq!(first.source, PredictionSource::Fallback);
        assert_eq!(first.predicted_progress, second.predicted_progress);
    }

    #[test]
    fn test_trained_prediction_is_finite() {
        let engine = engine();
        assert!(engine.train(&series(40), stamp()));

        let states = [
            CurrentState::default(),
            CurrentState {
                current_progress: 600.0,
                days_elapsed: 40.0,
                week_number: 38,
                month_number: 9,
                goals_completed_this_week: Some(1.0),
                avg_daily_progress_7d: Some(13.8),
                momentum_score: Some(0.0),
                consistency_score: Some(0.9),
            },
        ];
        for state in &states {
            let p = engine.predict(state, as_of());
            assert!(matches!(p.source, PredictionSource::Model(_)));
            assert!(p.predicted_progress.is_finite());
            assert!(p.success_probability.is_finite());
            assert!(p.optimal_weekly_target.is_finite());
            assert!(p.confidence_interval.lower <= p.confidence_interval.upper);
            assert!((0.0..=100.0).contains(&p.success_probability));
        }
    }

    #[test]
    fn test_invalid_features_fall_back() {
        let engine = engine();
        assert!(engine.train(&series(30), stamp()));
        let state = CurrentState {
            current_progress: 500.0,
            days_elapsed: f64::NAN,
            ..Default::default()
        };
        let p = engine.predict(&state, as_of());
        assert!(p.is_fallback());
        assert!(p.predicted_progress.is_finite());
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PredictionEngine>();
    }
}
