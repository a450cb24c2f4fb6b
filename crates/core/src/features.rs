//! Feature vector shared by training and inference.

use serde::{Deserialize, Serialize};

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 7;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "days_elapsed",
    "week_number",
    "month_number",
    "goals_completed_this_week",
    "avg_daily_progress_7d",
    "momentum_score",
    "consistency_score",
];

/// Neutral prior for the momentum score when the caller has none.
pub const DEFAULT_MOMENTUM: f64 = 0.5;

/// Neutral prior for the consistency score.
pub const DEFAULT_CONSISTENCY: f64 = 0.5;

/// Errors raised when a feature vector is malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    /// Wrong number of values
    #[error("expected {expected} features, got {actual}")]
    Shape {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// A value is NaN or infinite
    #[error("feature {name} is not finite ({value})")]
    NonFinite {
        /// Feature name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Model input for one point in time.
///
/// The field order is the model column order; [`FeatureVector::to_array`]
/// and [`FeatureVector::from_array`] are the only conversions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Days since campaign start
    pub days_elapsed: f64,
    /// ISO week number
    pub week_number: f64,
    /// Month number
    pub month_number: f64,
    /// Goals completed over the trailing 7 observations
    pub goals_completed_this_week: f64,
    /// Mean daily increment over the trailing 7 observations
    pub avg_daily_progress_7d: f64,
    /// Rolling mean of the progress acceleration
    pub momentum_score: f64,
    /// Inverse variability of daily increments, in [0, 1]
    pub consistency_score: f64,
}

impl FeatureVector {
    /// Values in model column order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.days_elapsed,
            self.week_number,
            self.month_number,
            self.goals_completed_this_week,
            self.avg_daily_progress_7d,
            self.momentum_score,
            self.consistency_score,
        ]
    }

    /// Rebuild from values in model column order.
    pub fn from_array(values: &[f64]) -> Result<Self, FeatureError> {
        if values.len() != FEATURE_COUNT {
            return Err(FeatureError::Shape {
                expected: FEATURE_COUNT,
                actual: values.len(),
            });
        }
        Ok(Self {
            days_elapsed: values[0],
            week_number: values[1],
            month_number: values[2],
            goals_completed_this_week: values[3],
            avg_daily_progress_7d: values[4],
            momentum_score: values[5],
            consistency_score: values[6],
        })
    }

    /// Check that every feature is finite.
    pub fn validate(&self) -> Result<(), FeatureError> {
        for (name, value) in FEATURE_NAMES.iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(FeatureError::NonFinite { name, value });
            }
        }
        Ok(())
    }
}

/// The caller's view of "now", used to request a prediction.
///
/// Optional features fall back to documented defaults: goals and average
/// progress to 0, momentum and consistency to a neutral 0.5.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentState {
    /// Latest cumulative progress value
    pub current_progress: f64,
    /// Days since campaign start
    pub days_elapsed: f64,
    /// ISO week number of today
    pub week_number: u32,
    /// Month number of today
    pub month_number: u32,
    /// Goals completed this week
    pub goals_completed_this_week: Option<f64>,
    /// Recent mean daily increment
    pub avg_daily_progress_7d: Option<f64>,
    /// Momentum score
    pub momentum_score: Option<f64>,
    /// Consistency score
    pub consistency_score: Option<f64>,
}

impl CurrentState {
    /// Resolve defaults into a full feature vector.
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            days_elapsed: self.days_elapsed,
            week_number: self.week_number as f64,
            month_number: self.month_number as f64,
            goals_completed_this_week: self.goals_completed_this_week.unwrap_or(0.0),
            avg_daily_progress_7d: self.avg_daily_progress_7d.unwrap_or(0.0),
            momentum_score: self.momentum_score.unwrap_or(DEFAULT_MOMENTUM),
            consistency_score: self.consistency_score.unwrap_or(DEFAULT_CONSISTENCY),
        }
    }
}
