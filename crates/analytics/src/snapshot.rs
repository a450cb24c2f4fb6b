//! Assembling a full analytics snapshot.

use chrono::{Datelike, NaiveDate};
use goalcast_core::{
    AnalyticsSnapshot, CurrentState, GoalConfig, GoalData, ProgressObservation,
};
use goalcast_engine::{build_features, PredictionEngine};

use crate::kpi::{goal_completion_rate, kpi_analysis};
use crate::trend::trend_analysis;
use crate::weekly::weekly_performance;

/// Progress reported before anything has been recorded.
pub const EMPTY_HISTORY_PROGRESS: f64 = 100.0;

/// Observations needed before the recent pace replaces the daily target.
const RECENT_PACE_MIN_OBSERVATIONS: usize = 7;

/// The current state implied by the history as of `as_of`.
///
/// Momentum and consistency come from the latest feature row. The recent
/// pace is used once more than a week has been recorded; before that the
/// daily target stands in.
pub fn current_state_from_series(
    series: &[ProgressObservation],
    goal: &GoalConfig,
    goals_completed_this_week: u32,
    as_of: NaiveDate,
) -> CurrentState {
    let (current_progress, days_elapsed) = match series.last() {
        Some(last) => (last.progress_value, goal.days_elapsed(as_of) as f64),
        None => (EMPTY_HISTORY_PROGRESS, 1.0),
    };

    let latest = build_features(series, goal).last().copied();
    let avg_daily = if series.len() > RECENT_PACE_MIN_OBSERVATIONS {
        latest.map(|f| f.avg_daily_progress_7d)
    } else {
        Some(goal.daily_target)
    };

    CurrentState {
        current_progress,
        days_elapsed,
        week_number: as_of.iso_week().week(),
        month_number: as_of.month(),
        goals_completed_this_week: Some(goals_completed_this_week as f64),
        avg_daily_progress_7d: avg_daily,
        momentum_score: latest.map(|f| f.momentum_score),
        consistency_score: latest.map(|f| f.consistency_score),
    }
}

/// Prediction, weekly, trend and KPI figures for one user as of `as_of`.
pub fn compute_analytics(
    engine: &PredictionEngine,
    series: &[ProgressObservation],
    goal_data: &GoalData,
    as_of: NaiveDate,
) -> AnalyticsSnapshot {
    let goal = engine.goal();
    let state = current_state_from_series(series, goal, goal_data.completed_this_week, as_of);
    let ml_prediction = engine.predict(&state, as_of);
    tracing::debug!(
        source = ?ml_prediction.source,
        predicted = ml_prediction.predicted_progress,
        "Prediction computed"
    );

    AnalyticsSnapshot {
        current_progress: state.current_progress,
        ml_prediction,
        weekly_performance: weekly_performance(series, &goal_data.records),
        trends: trend_analysis(series, goal),
        kpi_analysis: kpi_analysis(state.current_progress, state.days_elapsed, goal, as_of),
        goal_completion_rate: goal_completion_rate(goal_data.total, goal_data.completed),
    }
}
