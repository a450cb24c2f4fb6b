//! Goalcast prediction engine.
//!
//! Derives features from the progress history, trains a random forest, a
//! gradient boosting model and a linear model, and predicts the final
//! progress value with a pace projection as fallback.

#![warn(missing_docs, unused_crate_dependencies)]

mod config;
mod engine;
mod error;
pub mod features;
pub mod models;
pub mod predictor;
mod scaler;
pub mod stats;
pub mod trainer;

pub use config::EngineConfig;
pub use engine::{EngineState, PredictionEngine};
pub use error::{EngineError, Result};
pub use features::build_features;
pub use predictor::{fallback_prediction, predict_with};
pub use scaler::StandardScaler;
pub use trainer::{train_models, ModelScore, TrainedModel, TrainedSet, TrainingReport};
