//! Training configuration.

use serde::{Deserialize, Serialize};

/// Configuration for model training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fewer observations than this and training is declined
    pub min_training_samples: usize,
    /// Share of observations held out for scoring
    pub test_fraction: f64,
    /// Seed for the split and the forest bootstrap
    pub seed: u64,
    /// Trees per ensemble model
    pub n_estimators: usize,
    /// Shrinkage applied to each boosting stage
    pub learning_rate: f64,
    /// Depth of each boosting tree
    pub boosting_max_depth: usize,
    /// Depth limit of forest trees (None = fully grown)
    pub forest_max_depth: Option<usize>,
    /// Ridge term added to the linear normal equations
    pub ridge: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_training_samples: 20,
            test_fraction: 0.2,
            seed: 42,
            n_estimators: 100,
            learning_rate: 0.1,
            boosting_max_depth: 3,
            forest_max_depth: None,
            ridge: 1e-8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"seed": 7, "forest_max_depth": 6}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.forest_max_depth, Some(6));
        assert_eq!(config.min_training_samples, 20);
        assert_eq!(config.n_estimators, 100);
    }
}
