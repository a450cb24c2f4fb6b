//! Prediction value objects.

use serde::{Deserialize, Serialize};

/// Regression model families trained by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Bagged ensemble of regression trees
    RandomForest,
    /// Gradient boosted regression trees
    #[serde(rename = "gradient_boost")]
    GradientBoosting,
    /// Ordinary least squares
    Linear,
}

impl ModelKind {
    /// All kinds in declaration order. Best-model ties go to the earlier kind.
    pub const ALL: [ModelKind; 3] = [
        ModelKind::RandomForest,
        ModelKind::GradientBoosting,
        ModelKind::Linear,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::RandomForest => "random_forest",
            ModelKind::GradientBoosting => "gradient_boost",
            ModelKind::Linear => "linear",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lower/upper bound pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Build an interval from two bounds in any order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Whether `value` lies inside the interval.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Where a prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "model")]
pub enum PredictionSource {
    /// A trained regressor
    Model(ModelKind),
    /// Linear projection of the current pace
    Fallback,
}

/// Forecast of the final progress value with guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted value at the deadline
    pub predicted_progress: f64,
    /// Bounds around the prediction
    pub confidence_interval: ConfidenceInterval,
    /// Chance of reaching the target, 0-100
    pub success_probability: f64,
    /// Ordered recommendations
    pub recommendations: Vec<String>,
    /// Ordered risk factors
    pub risk_factors: Vec<String>,
    /// Weekly amount needed to reach the target
    pub optimal_weekly_target: f64,
    /// Model or fallback
    pub source: PredictionSource,
}

impl Prediction {
    /// Replace any non-finite number with 0.
    pub fn sanitized(mut self) -> Self {
        self.predicted_progress = finite_or(self.predicted_progress, 0.0);
        self.confidence_interval = ConfidenceInterval::new(
            finite_or(self.confidence_interval.lower, 0.0),
            finite_or(self.confidence_interval.upper, 0.0),
        );
        self.success_probability = finite_or(self.success_probability, 0.0);
        self.optimal_weekly_target = finite_or(self.optimal_weekly_target, 0.0);
        self
    }

    /// Whether this prediction is the pace projection rather than a model output.
    pub fn is_fallback(&self) -> bool {
        self.source == PredictionSource::Fallback
    }
}

/// `value` when finite, otherwise `default`.
pub fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        default
    }
}
