//! Goalcast core data models.
//!
//! This crate defines the value types shared by the store, the prediction
//! engine and the analytics layer.

#![warn(missing_docs)]

// Identities
mod id;

// Inputs
mod config;
mod goal;
mod observation;

// Model input and outputs
mod features;
mod prediction;
mod analytics;

// Re-exports
pub use id::GoalId;

pub use config::GoalConfig;
pub use goal::{GoalCompletion, GoalData, GoalRecord, NewGoal};
pub use observation::{series_from_values, ProgressObservation};

pub use features::{
    CurrentState, FeatureError, FeatureVector, DEFAULT_CONSISTENCY, DEFAULT_MOMENTUM,
    FEATURE_COUNT, FEATURE_NAMES,
};
pub use prediction::{finite_or, ConfidenceInterval, ModelKind, Prediction, PredictionSource};
pub use analytics::{
    AnalysisStatus, AnalyticsSnapshot, DataQuality, KpiAnalysis, ModelInsights, MomentumStatus,
    PredictionAccuracy, TrendAnalysis, WeeklyPerformance,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
