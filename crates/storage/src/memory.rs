//! In-memory store, used by tests and short-lived sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use goalcast_core::{GoalId, GoalRecord, ProgressObservation};

use super::{ProgressStore, Result};

/// Store keeping everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: Vec<ProgressObservation>,
    goals: HashMap<GoalId, GoalRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with a progress history.
    pub fn with_series(series: Vec<ProgressObservation>) -> Self {
        Self {
            series,
            goals: HashMap::new(),
        }
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_progress_series(&self) -> Result<Vec<ProgressObservation>> {
        Ok(self.series.clone())
    }

    async fn save_progress_series(&mut self, series: &[ProgressObservation]) -> Result<()> {
        self.series = series.to_vec();
        Ok(())
    }

    async fn save_goal(&mut self, goal: &GoalRecord) -> Result<()> {
        self.goals.insert(goal.id, goal.clone());
        Ok(())
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>> {
        Ok(self.goals.get(&id).cloned())
    }

    async fn list_user_goals(&self, user: &str) -> Result<Vec<GoalRecord>> {
        Ok(self
            .goals
            .values()
            .filter(|g| g.created_by == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use chrono::NaiveDate;
    use goalcast_core::{GoalCompletion, NewGoal};

    const USER: &str = "ana@example.com";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn weekly_goal(week_start: NaiveDate) -> NewGoal {
        NewGoal {
            week_start,
            week_end: week_start + chrono::Duration::days(6),
            description: "Push 100".to_string(),
            target_value: 100.0,
            category: "general".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_progress_derives_increment() {
        let mut store = MemoryStore::new();
        let first = store.append_progress(day(1), 50.0, 0).await.unwrap();
        let second = store.append_progress(day(2), 64.0, 1).await.unwrap();

        assert_eq!(first.daily_increment, None);
        assert_eq!(second.daily_increment, Some(14.0));
        assert_eq!(store.get_progress_series().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_append_progress_rejects_out_of_order() {
        let mut store = MemoryStore::new();
        store.append_progress(day(5), 50.0, 0).await.unwrap();
        let err = store.append_progress(day(5), 60.0, 0).await.unwrap_err();
        assert!(matches!(err, StorageError::OutOfOrder { .. }));
    }

    #[tokio::test]
    async fn test_complete_goal_only_by_creator() {
        let mut store = MemoryStore::new();
        let id = store.create_goal(weekly_goal(day(1)), USER).await.unwrap();
        let completion = GoalCompletion {
            goal_id: id,
            completed: true,
            actual_value: Some(120.0),
            notes: None,
        };

        assert!(!store.complete_goal(&completion, "bob@example.com").await.unwrap());
        assert!(store.complete_goal(&completion, USER).await.unwrap());

        let missing = GoalCompletion {
            goal_id: GoalId::new(),
            ..completion
        };
        assert!(!store.complete_goal(&missing, USER).await.unwrap());
    }

    #[tokio::test]
    async fn test_goal_counts() {
        let mut store = MemoryStore::new();
        let old = store.create_goal(weekly_goal(day(1)), USER).await.unwrap();
        let current = store.create_goal(weekly_goal(day(8)), USER).await.unwrap();
        store.create_goal(weekly_goal(day(8)), USER).await.unwrap();
        store.create_goal(weekly_goal(day(8)), "bob@example.com").await.unwrap();

        for goal_id in [old, current] {
            let completion = GoalCompletion {
                goal_id,
                completed: true,
                actual_value: None,
                notes: None,
            };
            store.complete_goal(&completion, USER).await.unwrap();
        }

        // 2025-09-10 is in the week starting 2025-09-08
        assert_eq!(store.count_goals_completed_this_week(USER, day(10)).await.unwrap(), 1);
        assert_eq!(store.count_goals_total_and_completed(USER).await.unwrap(), (3, 2));
        assert_eq!(store.list_goals(USER, Some(day(8))).await.unwrap().len(), 2);

        let data = store.goal_data(USER, day(10)).await.unwrap();
        assert_eq!(data.records.len(), 3);
        assert_eq!(data.completed_this_week, 1);
        assert_eq!((data.total, data.completed), (3, 2));
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_goals() {
        let store = MemoryStore::new();
        assert_eq!(store.count_goals_total_and_completed(USER).await.unwrap(), (0, 0));
        assert!(store.get_goal_records(USER).await.unwrap().is_empty());
    }
}
