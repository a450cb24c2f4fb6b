//! Turning a current state into a [`Prediction`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use goalcast_core::{
    ConfidenceInterval, CurrentState, FeatureVector, GoalConfig, Prediction, PredictionSource,
};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::models::Regressor;
use crate::stats::sample_std;
use crate::trainer::TrainedSet;

/// Half-width of the interval in standard deviations.
pub const CONFIDENCE_Z: f64 = 1.96;

/// Consistency below this is flagged.
pub const LOW_CONSISTENCY: f64 = 0.3;

/// Fallback interval as fractions of the projection.
pub const FALLBACK_BOUNDS: (f64, f64) = (0.8, 1.2);

/// Predict with `trained` when available, otherwise project the current
/// pace. Never fails: any model error degrades to the projection.
pub fn predict_with(
    trained: Option<&TrainedSet>,
    state: &CurrentState,
    goal: &GoalConfig,
    as_of: NaiveDate,
) -> Prediction {
    let Some(set) = trained else {
        return fallback_prediction(state, goal);
    };

    match model_prediction(set, state, goal, as_of) {
        Ok(prediction) => prediction.sanitized(),
        Err(e) => {
            warn!("Model prediction failed, using pace projection: {}", e);
            fallback_prediction(state, goal)
        }
    }
}

/// Prediction from the trained models.
pub fn model_prediction(
    set: &TrainedSet,
    state: &CurrentState,
    goal: &GoalConfig,
    as_of: NaiveDate,
) -> Result<Prediction> {
    let features = state.features();
    features.validate()?;
    if !state.current_progress.is_finite() {
        return Err(EngineError::Numerical(format!(
            "current progress is not finite ({})",
            state.current_progress
        )));
    }

    let row = set.scaler.transform(&features.to_array());
    let mut per_model = BTreeMap::new();
    for (kind, trained) in &set.models {
        let value = trained.model.predict_row(&row);
        if !value.is_finite() {
            return Err(EngineError::Numerical(format!("{kind} predicted {value}")));
        }
        per_model.insert(*kind, value);
    }

    let predicted = *per_model.get(&set.best_model).ok_or(EngineError::NotTrained)?;
    let values: Vec<f64> = per_model.values().copied().collect();
    let spread = if values.len() > 1 { sample_std(&values) } else { 0.0 };

    Ok(Prediction {
        predicted_progress: predicted,
        confidence_interval: ConfidenceInterval::new(
            predicted - CONFIDENCE_Z * spread,
            predicted + CONFIDENCE_Z * spread,
        ),
        success_probability: success_probability(predicted, goal),
        recommendations: recommendations(predicted, features.consistency_score, goal),
        risk_factors: risk_factors(&features, goal),
        optimal_weekly_target: optimal_weekly_target(state.current_progress, goal, as_of),
        source: PredictionSource::Model(set.best_model),
    })
}

/// Linear projection of the average pace so far.
pub fn fallback_prediction(state: &CurrentState, goal: &GoalConfig) -> Prediction {
    let daily_rate = state.current_progress / state.days_elapsed.max(1.0);
    let predicted = daily_rate * goal.total_days() as f64;
    let (low, high) = FALLBACK_BOUNDS;
    let (lower, upper) = (predicted * low, predicted * high);
    if lower > upper {
        warn!(lower, upper, "Projection is negative, interval bounds swapped");
    }

    Prediction {
        predicted_progress: predicted,
        confidence_interval: ConfidenceInterval::new(lower, upper),
        success_probability: success_probability(predicted, goal),
        recommendations: vec![
            "Keep the current pace".to_string(),
            "Monitor progress weekly".to_string(),
        ],
        risk_factors: vec!["Insufficient data for advanced analysis".to_string()],
        optimal_weekly_target: daily_rate * 7.0,
        source: PredictionSource::Fallback,
    }
    .sanitized()
}

/// Predicted value as a percentage of the target, within 0-100.
pub fn success_probability(predicted: f64, goal: &GoalConfig) -> f64 {
    let pct = predicted / goal.target_value * 100.0;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}

/// Amount per week still needed; at least one week is assumed left.
pub fn optimal_weekly_target(current_progress: f64, goal: &GoalConfig, as_of: NaiveDate) -> f64 {
    let weeks_remaining = (goal.days_remaining(as_of) as f64 / 7.0).max(1.0);
    (goal.target_value - current_progress) / weeks_remaining
}

/// Guidance keyed by how the prediction compares to the target.
pub fn recommendations(predicted: f64, consistency: f64, goal: &GoalConfig) -> Vec<String> {
    let target = goal.target_value;
    let band: [&str; 2] = if predicted < target * 6.0 / 7.0 {
        [
            "Urgent action: significantly increase the pace",
            "Review strategy and raise weekly targets",
        ]
    } else if predicted < target * 13.0 / 14.0 {
        [
            "Attention needed: accelerate progress",
            "Focus on high-impact goals",
        ]
    } else if predicted < target {
        [
            "Good progress: keep it consistent",
            "Small adjustments can secure success",
        ]
    } else {
        [
            "Excellent progress! The goal is within reach",
            "Keep the current strategy",
        ]
    };

    let mut out: Vec<String> = band.iter().map(|s| s.to_string()).collect();
    if consistency < LOW_CONSISTENCY {
        out.push("Improve consistency: set a daily routine".to_string());
    }
    out
}

/// Conditions that put the goal at risk.
pub fn risk_factors(features: &FeatureVector, goal: &GoalConfig) -> Vec<String> {
    let mut risks = Vec::new();
    if features.momentum_score < 0.0 {
        risks.push("Negative momentum detected".to_string());
    }
    if features.consistency_score < LOW_CONSISTENCY {
        risks.push("Low consistency in progress".to_string());
    }
    if features.avg_daily_progress_7d < goal.required_daily_pace() {
        risks.push("Daily progress below the required pace".to_string());
    }
    risks
}
