//! Summary of the last four weeks.

use std::collections::BTreeMap;

use goalcast_core::{finite_or, AnalysisStatus, GoalRecord, ProgressObservation, WeeklyPerformance};
use goalcast_engine::stats::{mean, sample_std};

/// Observations needed for a weekly summary.
pub const WEEKLY_WINDOW: usize = 28;

/// Group the trailing four weeks by ISO week and summarize the per-week
/// mean increments. Goal counts come from `goals` regardless of status.
pub fn weekly_performance(series: &[ProgressObservation], goals: &[GoalRecord]) -> WeeklyPerformance {
    let goals_set = goals.len() as u32;
    let goals_completed = goals.iter().filter(|g| g.is_completed()).count() as u32;
    let insufficient = WeeklyPerformance {
        status: AnalysisStatus::InsufficientData,
        goals_set,
        goals_completed,
        ..Default::default()
    };

    if series.len() < WEEKLY_WINDOW {
        return insufficient;
    }

    let mut weeks: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for obs in &series[series.len() - WEEKLY_WINDOW..] {
        let bucket = weeks.entry(obs.week_number).or_default();
        if let Some(inc) = obs.daily_increment.filter(|v| v.is_finite()) {
            bucket.push(inc);
        }
    }
    let weekly_means: Vec<f64> = weeks
        .values()
        .filter(|incs| !incs.is_empty())
        .map(|incs| mean(incs))
        .collect();
    if weekly_means.is_empty() {
        return insufficient;
    }

    let best = weekly_means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst = weekly_means.iter().copied().fold(f64::INFINITY, f64::min);

    WeeklyPerformance {
        status: AnalysisStatus::Ok,
        avg_weekly_progress: finite_or(mean(&weekly_means), 0.0),
        best_week: finite_or(best, 0.0),
        worst_week: finite_or(worst, 0.0),
        consistency: finite_or(sample_std(&weekly_means), 0.0),
        goals_set,
        goals_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use goalcast_core::{GoalCompletion, NewGoal, ProgressObservation};

    fn series(days: usize, increment: impl Fn(usize) -> f64) -> Vec<ProgressObservation> {
        // 2025-09-01 is a Monday
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let mut value = 100.0;
        (0..days)
            .map(|i| {
                let inc = increment(i);
                value += inc;
                ProgressObservation::new(start + Duration::days(i as i64), value, Some(inc), 0)
            })
            .collect()
    }

    fn goal(done: bool) -> GoalRecord {
        let week_start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let mut record = GoalRecord::from_new(
            NewGoal {
                week_start,
                week_end: week_start + Duration::days(6),
                description: "weekly".to_string(),
                target_value: 90.0,
                category: "general".to_string(),
            },
            "ana@example.com",
        );
        if done {
            record.apply(&GoalCompletion {
                goal_id: record.id,
                completed: true,
                actual_value: Some(95.0),
                notes: None,
            });
        }
        record
    }

    #[test]
    fn test_short_history_keeps_goal_counts() {
        let goals = vec![goal(true), goal(false)];
        let weekly = weekly_performance(&series(27, |_| 10.0), &goals);
        assert_eq!(weekly.status, AnalysisStatus::InsufficientData);
        assert_eq!(weekly.avg_weekly_progress, 0.0);
        assert_eq!(weekly.goals_set, 2);
        assert_eq!(weekly.goals_completed, 1);
    }

    #[test]
    fn test_empty_history() {
        let weekly = weekly_performance(&[], &[]);
        assert_eq!(weekly.status, AnalysisStatus::InsufficientData);
        assert_eq!(weekly.goals_set, 0);
    }

    #[test]
    fn test_four_aligned_weeks() {
        // Week k has a constant increment of 10 * (k + 1).
        let weekly = weekly_performance(&series(28, |i| 10.0 * (i / 7 + 1) as f64), &[]);
        assert_eq!(weekly.status, AnalysisStatus::Ok);
        assert_eq!(weekly.avg_weekly_progress, 25.0);
        assert_eq!(weekly.best_week, 40.0);
        assert_eq!(weekly.worst_week, 10.0);
        assert!((weekly.consistency - 12.909944487358056).abs() < 1e-9);
    }

    #[test]
    fn test_only_trailing_window_counts() {
        // The first 7 days are excluded from the trailing 28.
        let weekly = weekly_performance(&series(35, |i| if i < 7 { 1000.0 } else { 5.0 }), &[]);
        assert_eq!(weekly.best_week, 5.0);
        assert_eq!(weekly.consistency, 0.0);
    }
}
