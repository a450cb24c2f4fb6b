//! Analytics value objects assembled per request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::prediction::{ModelKind, Prediction};

/// Whether an analysis had enough data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Computed from sufficient history
    #[default]
    Ok,
    /// Too few observations; numeric fields are zeroed
    InsufficientData,
}

/// Summary of the last four weeks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    /// Analysis status
    pub status: AnalysisStatus,
    /// Mean of the per-week mean increments
    pub avg_weekly_progress: f64,
    /// Best per-week mean increment
    pub best_week: f64,
    /// Worst per-week mean increment
    pub worst_week: f64,
    /// Sample std-dev of the per-week means
    pub consistency: f64,
    /// Goals set by the user
    pub goals_set: u32,
    /// Goals completed by the user
    pub goals_completed: u32,
}

/// Short-term versus long-term pace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Analysis status
    pub status: AnalysisStatus,
    /// Mean increment over the last 7 observations
    pub recent_7_days_avg: f64,
    /// Mean increment over the last 14 observations
    pub recent_14_days_avg: f64,
    /// Mean increment over the whole history
    pub overall_average: f64,
    /// `recent_7 - recent_14`
    pub momentum: f64,
    /// Direction of the momentum
    pub momentum_status: MomentumStatus,
    /// `recent_7 - daily_target`
    pub vs_target: f64,
}

/// Direction of short-term pace change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumStatus {
    /// Recent pace is above the two-week pace
    Accelerating,
    /// Recent pace is at or below the two-week pace
    #[default]
    Decelerating,
}

/// Key performance indicators against the goal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiAnalysis {
    /// Progress per elapsed day
    pub current_daily_average: f64,
    /// Configured daily target
    pub target_daily_average: f64,
    /// Current pace as a percentage of the daily target
    pub performance_vs_target_pct: f64,
    /// Days left until the deadline (negative once passed)
    pub days_remaining: i64,
    /// Daily pace needed for the rest of the campaign
    pub required_daily_remaining: f64,
    /// Progress as a percentage of the target
    pub progress_percentage: f64,
    /// Pace is at least 95% of the daily target
    pub on_track: bool,
}

/// Everything returned for one analytics request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Latest cumulative progress value
    pub current_progress: f64,
    /// Model (or fallback) prediction
    pub ml_prediction: Prediction,
    /// Weekly summary
    pub weekly_performance: WeeklyPerformance,
    /// Trend summary
    pub trends: TrendAnalysis,
    /// KPI summary
    pub kpi_analysis: KpiAnalysis,
    /// Completed goals as a percentage of all goals
    pub goal_completion_rate: f64,
}

/// How much the trained models can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionAccuracy {
    /// Models are trained
    High,
    /// Fallback projection only
    Limited,
}

/// Quick statistics about the raw history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataQuality {
    /// Number of observations
    pub total_days: usize,
    /// Sample std-dev of daily increments
    pub increment_std: f64,
    /// Increments more than three std-devs above the mean
    pub outliers_detected: usize,
}

/// State of the trained models and the data behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInsights {
    /// Whether models are trained
    pub is_trained: bool,
    /// Best model, if trained
    pub best_model: Option<ModelKind>,
    /// Held-out R² per model
    pub model_scores: BTreeMap<ModelKind, f64>,
    /// Feature names in model order
    pub feature_names: Vec<String>,
    /// Trust level
    pub prediction_accuracy: PredictionAccuracy,
    /// History statistics
    pub data_quality: DataQuality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AnalysisStatus::InsufficientData).unwrap(),
            "\"insufficient_data\""
        );
        assert_eq!(
            serde_json::to_string(&MomentumStatus::Accelerating).unwrap(),
            "\"accelerating\""
        );
    }

    #[test]
    fn test_defaults_are_zeroed() {
        let weekly = WeeklyPerformance::default();
        assert_eq!(weekly.status, AnalysisStatus::Ok);
        assert_eq!(weekly.avg_weekly_progress, 0.0);
        assert_eq!(TrendAnalysis::default().momentum_status, MomentumStatus::Decelerating);
    }
}
