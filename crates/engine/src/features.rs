//! Feature derivation from the daily progress series.
//!
//! Rolling windows only produce a value once every input in the window is
//! present, so the first rows of a short history are gaps. After derivation
//! each column is filled backward from the next finite value and any gap
//! left at the end of the history becomes 0.

use goalcast_core::{FeatureVector, GoalConfig, ProgressObservation, FEATURE_COUNT};

use crate::stats::{mean, sample_std};

/// Window of the momentum and consistency scores.
pub const LONG_WINDOW: usize = 14;

/// Window of the average progress and goal count features.
pub const SHORT_WINDOW: usize = 7;

/// Derive one feature vector per observation.
pub fn build_features(series: &[ProgressObservation], goal: &GoalConfig) -> Vec<FeatureVector> {
    if series.is_empty() {
        return Vec::new();
    }

    let values: Vec<f64> = series.iter().map(|o| o.progress_value).collect();
    let d1 = diff(&values.iter().copied().map(Some).collect::<Vec<_>>());
    let d2 = diff(&d1);
    let goals: Vec<Option<f64>> = series.iter().map(|o| Some(o.goals_completed as f64)).collect();

    let momentum: Vec<Option<f64>> = rolling(&d2, LONG_WINDOW, mean)
        .into_iter()
        .map(|v| Some(v.unwrap_or(0.0)))
        .collect();
    let consistency: Vec<Option<f64>> = rolling(&d1, LONG_WINDOW, consistency_score)
        .into_iter()
        .map(|v| Some(v.filter(|c| c.is_finite()).unwrap_or(goalcast_core::DEFAULT_CONSISTENCY)))
        .collect();
    let avg_daily = rolling(&d1, SHORT_WINDOW, mean);
    let goals_week = rolling(&goals, SHORT_WINDOW, |w| w.iter().sum());

    let mut columns: [Vec<Option<f64>>; FEATURE_COUNT] = [
        series
            .iter()
            .map(|o| Some(goal.days_elapsed(o.date) as f64))
            .collect(),
        series.iter().map(|o| Some(o.week_number as f64)).collect(),
        series.iter().map(|o| Some(o.month_number as f64)).collect(),
        goals_week,
        avg_daily,
        momentum,
        consistency,
    ];
    for column in columns.iter_mut() {
        backfill(column);
    }

    (0..series.len())
        .map(|i| {
            let row: Vec<f64> = columns.iter().map(|c| c[i].unwrap_or(0.0)).collect();
            // Every column has one entry per observation.
            FeatureVector::from_array(&row).unwrap_or_default()
        })
        .collect()
}

/// First difference; the first entry is missing.
fn diff(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let d = match (i.checked_sub(1).and_then(|p| values[p]), values[i]) {
            (Some(prev), Some(cur)) => Some(cur - prev),
            _ => None,
        };
        out.push(d);
    }
    out
}

/// Apply `f` to each full window ending at each index.
fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().all(|v| v.is_some_and(|x| !x.is_nan())) {
            let present: Vec<f64> = slice.iter().flatten().copied().collect();
            out[end - 1] = Some(f(&present));
        }
    }
    out
}

/// `1 / (1 + std / mean)` of a window of increments.
fn consistency_score(window: &[f64]) -> f64 {
    let cv = sample_std(window) / mean(window);
    1.0 / (1.0 + cv)
}

/// Fill each gap or non-finite value from the next finite value.
fn backfill(column: &mut [Option<f64>]) {
    let mut next: Option<f64> = None;
    for slot in column.iter_mut().rev() {
        match *slot {
            Some(v) if v.is_finite() => next = Some(v),
            _ => *slot = next,
        }
    }
}
