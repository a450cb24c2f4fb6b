//! Store trait abstraction.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use goalcast_core::{GoalCompletion, GoalData, GoalId, GoalRecord, NewGoal, ProgressObservation};

/// Error type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Number of goal records returned by [`ProgressStore::get_goal_records`].
pub const RECENT_GOALS_LIMIT: usize = 20;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Observation would break chronological order
    #[error("observation for {date} is not after the last recorded day {last}")]
    OutOfOrder {
        /// Rejected date
        date: NaiveDate,
        /// Last stored date
        last: NaiveDate,
    },

    /// Sample distribution could not be built
    #[error("invalid sample distribution: {0}")]
    Sampling(String),
}

/// Source of the progress history and weekly goals.
///
/// Implementations only need the raw load/save operations; the goal queries
/// used by the analytics layer are provided on top of them.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    // === Progress history ===

    /// Chronologically ordered progress observations.
    async fn get_progress_series(&self) -> Result<Vec<ProgressObservation>>;

    /// Replace the whole progress history.
    async fn save_progress_series(&mut self, series: &[ProgressObservation]) -> Result<()>;

    // === Weekly goals ===

    /// Save a goal record (create or update).
    async fn save_goal(&mut self, goal: &GoalRecord) -> Result<()>;

    /// Load a goal record by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>>;

    /// All goal records created by `user`, in no particular order.
    async fn list_user_goals(&self, user: &str) -> Result<Vec<GoalRecord>>;

    // === Provided operations ===

    /// Record the progress value of a day, deriving increment and calendar fields.
    async fn append_progress(
        &mut self,
        date: NaiveDate,
        progress_value: f64,
        goals_completed: u32,
    ) -> Result<ProgressObservation> {
        let mut series = self.get_progress_series().await?;
        if let Some(last) = series.last() {
            if date <= last.date {
                return Err(StorageError::OutOfOrder { date, last: last.date });
            }
        }

        let obs = ProgressObservation::next(series.last(), date, progress_value, goals_completed);
        series.push(obs.clone());
        self.save_progress_series(&series).await?;

        tracing::debug!(%date, progress_value, "Recorded progress");
        Ok(obs)
    }

    /// Create a weekly goal for `user`.
    async fn create_goal(&mut self, goal: NewGoal, user: &str) -> Result<GoalId> {
        let record = GoalRecord::from_new(goal, user);
        self.save_goal(&record).await?;
        tracing::info!("Weekly goal created: {}", record.id);
        Ok(record.id)
    }

    /// Apply a completion update. Returns false when the goal does not
    /// exist or belongs to another user.
    async fn complete_goal(&mut self, completion: &GoalCompletion, user: &str) -> Result<bool> {
        let Some(mut record) = self.load_goal(completion.goal_id).await? else {
            return Ok(false);
        };
        if record.created_by != user {
            return Ok(false);
        }

        record.apply(completion);
        self.save_goal(&record).await?;
        tracing::info!("Goal {} updated by {}", completion.goal_id, user);
        Ok(true)
    }

    /// Goals of `user`: those of one week (newest first) when `week_start`
    /// is given, otherwise the most recent weeks.
    async fn list_goals(&self, user: &str, week_start: Option<NaiveDate>) -> Result<Vec<GoalRecord>> {
        let goals = self.list_user_goals(user).await?;
        Ok(match week_start {
            Some(week) => goals_of_week(goals, week),
            None => recent_goals(goals),
        })
    }

    /// The most recent goal records of `user`.
    async fn get_goal_records(&self, user: &str) -> Result<Vec<GoalRecord>> {
        self.list_goals(user, None).await
    }

    /// Goals of `user` completed in the week containing `as_of`.
    async fn count_goals_completed_this_week(&self, user: &str, as_of: NaiveDate) -> Result<u32> {
        let week_start = monday_of(as_of);
        let goals = self.list_user_goals(user).await?;
        Ok(goals
            .iter()
            .filter(|g| g.is_completed() && g.week_start >= week_start)
            .count() as u32)
    }

    /// `(total, completed)` goal counts of `user`.
    async fn count_goals_total_and_completed(&self, user: &str) -> Result<(u32, u32)> {
        let goals = self.list_user_goals(user).await?;
        let completed = goals.iter().filter(|g| g.is_completed()).count();
        Ok((goals.len() as u32, completed as u32))
    }

    /// Everything the analytics layer needs about `user`'s goals.
    async fn goal_data(&self, user: &str, as_of: NaiveDate) -> Result<GoalData> {
        let records = self.get_goal_records(user).await?;
        let completed_this_week = self.count_goals_completed_this_week(user, as_of).await?;
        let (total, completed) = self.count_goals_total_and_completed(user).await?;
        Ok(GoalData {
            records,
            completed_this_week,
            total,
            completed,
        })
    }
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn goals_of_week(goals: Vec<GoalRecord>, week: NaiveDate) -> Vec<GoalRecord> {
    let mut goals: Vec<_> = goals.into_iter().filter(|g| g.week_start == week).collect();
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    goals
}

fn recent_goals(mut goals: Vec<GoalRecord>) -> Vec<GoalRecord> {
    goals.sort_by(|a, b| {
        b.week_start
            .cmp(&a.week_start)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    goals.truncate(RECENT_GOALS_LIMIT);
    goals
}
