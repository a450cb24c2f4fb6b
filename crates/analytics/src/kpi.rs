//! Key performance indicators.

use chrono::NaiveDate;
use goalcast_core::{finite_or, GoalConfig, KpiAnalysis};

/// Pace at or above this share of the daily target is on track.
pub const ON_TRACK_PCT: f64 = 95.0;

/// Pace and remaining effort relative to the goal as of `as_of`.
pub fn kpi_analysis(
    current_progress: f64,
    days_elapsed: f64,
    goal: &GoalConfig,
    as_of: NaiveDate,
) -> KpiAnalysis {
    let current_daily_average = finite_or(current_progress / days_elapsed.max(1.0), 0.0);
    let performance_vs_target_pct =
        finite_or(current_daily_average / goal.daily_target * 100.0, 0.0);
    let days_remaining = goal.days_remaining(as_of);
    let required_daily_remaining = finite_or(
        (goal.target_value - current_progress) / days_remaining.max(1) as f64,
        0.0,
    );

    KpiAnalysis {
        current_daily_average,
        target_daily_average: goal.daily_target,
        performance_vs_target_pct,
        days_remaining,
        required_daily_remaining,
        progress_percentage: finite_or(current_progress / goal.target_value * 100.0, 0.0),
        on_track: performance_vs_target_pct >= ON_TRACK_PCT,
    }
}

/// Completed goals as a percentage of all goals, 0 without goals.
pub fn goal_completion_rate(total: u32, completed: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}
