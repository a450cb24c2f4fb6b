//! Short-term versus long-term pace.

use goalcast_core::{
    finite_or, AnalysisStatus, GoalConfig, MomentumStatus, ProgressObservation, TrendAnalysis,
};
use goalcast_engine::stats::mean_present;

/// Observations needed for a trend.
pub const TREND_WINDOW: usize = 14;

/// Compare the last 7 and 14 days of increments with the whole history.
pub fn trend_analysis(series: &[ProgressObservation], goal: &GoalConfig) -> TrendAnalysis {
    if series.len() < TREND_WINDOW {
        return TrendAnalysis {
            status: AnalysisStatus::InsufficientData,
            ..Default::default()
        };
    }

    let tail_mean = |n: usize| {
        let tail = &series[series.len() - n..];
        finite_or(mean_present(tail.iter().map(|o| o.daily_increment)), 0.0)
    };
    let recent_7 = tail_mean(7);
    let recent_14 = tail_mean(14);
    let overall = tail_mean(series.len());

    let momentum = recent_7 - recent_14;
    let momentum_status = if momentum > 0.0 {
        MomentumStatus::Accelerating
    } else {
        MomentumStatus::Decelerating
    };

    TrendAnalysis {
        status: AnalysisStatus::Ok,
        recent_7_days_avg: recent_7,
        recent_14_days_avg: recent_14,
        overall_average: overall,
        momentum,
        momentum_status,
        vs_target: recent_7 - goal.daily_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(increments: &[f64]) -> Vec<ProgressObservation> {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut value = 50.0;
        increments
            .iter()
            .enumerate()
            .map(|(i, inc)| {
                value += inc;
                ProgressObservation::new(start + Duration::days(i as i64), value, Some(*inc), 0)
            })
            .collect()
    }

    #[test]
    fn test_constant_pace_is_not_accelerating() {
        let trend = trend_analysis(&series(&[13.8; 30]), &GoalConfig::default());
        assert_eq!(trend.status, AnalysisStatus::Ok);
        assert!(trend.momentum.abs() < 1e-9);
        assert_eq!(trend.momentum_status, MomentumStatus::Decelerating);
        assert!(trend.vs_target.abs() < 1e-9);
        assert!((trend.overall_average - 13.8).abs() < 1e-9);
    }

    #[test]
    fn test_zero_momentum_is_decelerating() {
        let trend = trend_analysis(&series(&[10.0; 14]), &GoalConfig::default());
        assert_eq!(trend.momentum, 0.0);
        assert_eq!(trend.momentum_status, MomentumStatus::Decelerating);
    }

    #[test]
    fn test_speeding_up() {
        let mut incs = vec![10.0; 7];
        incs.extend([20.0; 7]);
        let trend = trend_analysis(&series(&incs), &GoalConfig::default());
        assert_eq!(trend.recent_7_days_avg, 20.0);
        assert_eq!(trend.recent_14_days_avg, 15.0);
        assert_eq!(trend.momentum, 5.0);
        assert_eq!(trend.momentum_status, MomentumStatus::Accelerating);
        assert!((trend.vs_target - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_increments_are_skipped() {
        let mut s = series(&[10.0; 20]);
        s[0].daily_increment = None;
        s[19].daily_increment = None;
        let trend = trend_analysis(&s, &GoalConfig::default());
        assert_eq!(trend.recent_7_days_avg, 10.0);
        assert_eq!(trend.overall_average, 10.0);
    }

    #[test]
    fn test_insufficient_history() {
        let trend = trend_analysis(&series(&[10.0; 13]), &GoalConfig::default());
        assert_eq!(trend.status, AnalysisStatus::InsufficientData);
        assert_eq!(trend.momentum, 0.0);
        assert!(trend_analysis(&[], &GoalConfig::default()).status == AnalysisStatus::InsufficientData);
    }

    #[test]
    fn test_all_missing_increments_are_zeroed() {
        let mut s = series(&[10.0; 14]);
        for obs in &mut s {
            obs.daily_increment = None;
        }
        let trend = trend_analysis(&s, &GoalConfig::default());
        assert_eq!(trend.recent_7_days_avg, 0.0);
        assert_eq!(trend.momentum, 0.0);
    }
}
