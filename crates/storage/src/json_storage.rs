//! JSON file store implementation.
//!
//! Keeps the progress history in a single `progress.json` and each weekly
//! goal in its own `goals/<id>.json`, under a `.goalcast` directory.

use std::path::{Path, PathBuf};

use goalcast_core::{GoalId, GoalRecord, ProgressObservation};
use tokio::fs;

use super::{ProgressStore, Result};

/// File-based JSON store.
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open the store, creating its directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("goals")).await?;
        tracing::debug!("Opened JSON store at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn progress_path(&self) -> PathBuf {
        self.root.join("progress.json")
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl ProgressStore for JsonStore {
    async fn get_progress_series(&self) -> Result<Vec<ProgressObservation>> {
        let mut series: Vec<ProgressObservation> =
            read_json(&self.progress_path()).await?.unwrap_or_default();
        series.sort_by_key(|o| o.date);
        Ok(series)
    }

    async fn save_progress_series(&mut self, series: &[ProgressObservation]) -> Result<()> {
        write_json(&self.progress_path(), series).await
    }

    async fn save_goal(&mut self, goal: &GoalRecord) -> Result<()> {
        write_json(&self.goal_path(goal.id), goal).await
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>> {
        read_json(&self.goal_path(id)).await
    }

    async fn list_user_goals(&self, user: &str) -> Result<Vec<GoalRecord>> {
        let all: Vec<GoalRecord> = list_dir(&self.root.join("goals")).await?;
        Ok(all.into_iter().filter(|g| g.created_by == user).collect())
    }
}

async fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    // Readers never see a partially written document.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping unreadable {}: {}", entry.path().display(), e),
        }
    }
    Ok(items)
}
