//! Weekly goal records - the per-user targets set alongside the main goal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::GoalId;
use crate::Time;

/// A weekly goal set by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Unique identifier
    pub id: GoalId,

    /// First day of the goal week
    pub week_start: NaiveDate,

    /// Last day of the goal week
    pub week_end: NaiveDate,

    /// What the goal is about
    pub description: String,

    /// Value the user aims for this week
    pub target_value: f64,

    /// Value actually reached, once reported
    pub actual_value: Option<f64>,

    /// Completion flag, `None` until the goal is reviewed
    pub completed: Option<bool>,

    /// When the goal was marked completed
    pub completed_date: Option<Time>,

    /// User that created the goal
    pub created_by: String,

    /// Free-form category
    #[serde(default = "default_category")]
    pub category: String,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

fn default_category() -> String {
    "general".to_string()
}

impl GoalRecord {
    /// Build a record from a creation request.
    pub fn from_new(goal: NewGoal, user: &str) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: GoalId::new(),
            week_start: goal.week_start,
            week_end: goal.week_end,
            description: goal.description,
            target_value: goal.target_value,
            actual_value: None,
            completed: None,
            completed_date: None,
            created_by: user.to_string(),
            category: goal.category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the goal has been marked as completed.
    pub fn is_completed(&self) -> bool {
        self.completed == Some(true)
    }

    /// Apply a completion update.
    pub fn apply(&mut self, completion: &GoalCompletion) {
        let now = chrono::Utc::now();
        self.completed = Some(completion.completed);
        self.actual_value = completion.actual_value;
        self.completed_date = completion.completed.then_some(now);
        self.updated_at = now;
    }
}

/// Request to create a weekly goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    /// First day of the goal week
    pub week_start: NaiveDate,
    /// Last day of the goal week
    pub week_end: NaiveDate,
    /// Description
    pub description: String,
    /// Target value
    pub target_value: f64,
    /// Category
    #[serde(default = "default_category")]
    pub category: String,
}

/// Request to mark a weekly goal as (not) completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCompletion {
    /// Goal being updated
    pub goal_id: GoalId,
    /// New completion flag
    pub completed: bool,
    /// Reached value, if known
    pub actual_value: Option<f64>,
    /// Optional notes
    pub notes: Option<String>,
}

/// Goal figures supplied by the store for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalData {
    /// Most recent goal records of the user
    pub records: Vec<GoalRecord>,
    /// Goals completed during the current week
    pub completed_this_week: u32,
    /// Total number of goals of the user
    pub total: u32,
    /// Completed goals of the user
    pub completed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_goal() -> NewGoal {
        NewGoal {
            week_start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2025, 9, 7).unwrap(),
            description: "Hit 100 this week".to_string(),
            target_value: 100.0,
            category: default_category(),
        }
    }

    #[test]
    fn test_from_new_starts_unreviewed() {
        let record = GoalRecord::from_new(new_goal(), "ana@example.com");
        assert_eq!(record.created_by, "ana@example.com");
        assert_eq!(record.completed, None);
        assert!(!record.is_completed());
        assert_eq!(record.category, "general");
    }

    #[test]
    fn test_apply_completion_sets_date_only_when_completed() {
        let mut record = GoalRecord::from_new(new_goal(), "ana@example.com");
        record.apply(&GoalCompletion {
            goal_id: record.id,
            completed: true,
            actual_value: Some(104.0),
            notes: None,
        });
        assert!(record.is_completed());
        assert!(record.completed_date.is_some());
        assert_eq!(record.actual_value, Some(104.0));

        record.apply(&GoalCompletion {
            goal_id: record.id,
            completed: false,
            actual_value: None,
            notes: Some("missed".to_string()),
        });
        assert!(!record.is_completed());
        assert!(record.completed_date.is_none());
    }

    #[test]
    fn test_category_defaults_when_missing() {
        let json = r#"{"week_start":"2025-09-01","week_end":"2025-09-07","description":"x","target_value":5.0}"#;
        let goal: NewGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.category, "general");
    }
}
