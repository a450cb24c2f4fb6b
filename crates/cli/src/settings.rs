//! Settings file and command line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use goalcast_core::GoalConfig;
use goalcast_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Contents of the `--config` JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tracked goal
    pub goal: GoalConfig,
    /// Training settings
    pub engine: EngineConfig,
}

impl Settings {
    /// Read settings from `path`, or defaults when no path is given.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply `--target` and `--deadline`.
    pub fn with_overrides(mut self, target: Option<f64>, deadline: Option<NaiveDate>) -> Self {
        if let Some(target) = target {
            self.goal.target_value = target;
        }
        if let Some(deadline) = deadline {
            self.goal.deadline = deadline;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_path_gives_defaults() {
        let settings = Settings::load(None).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goalcast.json");
        tokio::fs::write(&path, r#"{"goal": {"target_value": 9000}, "engine": {"seed": 1}}"#)
            .await
            .unwrap();

        let settings = Settings::load(Some(&path)).await.unwrap();
        assert_eq!(settings.goal.target_value, 9000.0);
        assert_eq!(settings.goal.daily_target, 13.8);
        assert_eq!(settings.engine.seed, 1);
        assert_eq!(settings.engine.n_estimators, 100);
    }

    #[tokio::test]
    async fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{ nope").await.unwrap();
        assert!(Settings::load(Some(&path)).await.is_err());
        assert!(Settings::load(Some(&dir.path().join("absent.json"))).await.is_err());
    }

    #[test]
    fn test_overrides() {
        let deadline = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let settings = Settings::default().with_overrides(Some(8000.0), Some(deadline));
        assert_eq!(settings.goal.target_value, 8000.0);
        assert_eq!(settings.goal.deadline, deadline);

        let untouched = Settings::default().with_overrides(None, None);
        assert_eq!(untouched, Settings::default());
    }
}
