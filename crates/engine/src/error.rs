//! Error types for the prediction engine.

use goalcast_core::FeatureError;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while training or running models.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Not enough observations for the requested operation
    #[error("insufficient data: need {required} observations, have {actual}")]
    InsufficientData {
        /// Minimum number of observations
        required: usize,
        /// Observations supplied
        actual: usize,
    },

    /// Malformed or non-finite feature input
    #[error("invalid feature input: {0}")]
    InvalidFeature(#[from] FeatureError),

    /// Arithmetic failure while fitting or predicting
    #[error("numerical error: {0}")]
    Numerical(String),

    /// No trained models are available
    #[error("models are not trained")]
    NotTrained,
}
