//! Goal configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The tracked goal: a cumulative value to reach by a fixed deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalConfig {
    /// Value the cumulative progress must reach
    pub target_value: f64,

    /// First day of the campaign
    pub campaign_start: NaiveDate,

    /// Last day of the campaign
    pub deadline: NaiveDate,

    /// Reference daily pace used by trend and KPI figures
    pub daily_target: f64,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            target_value: 7000.0,
            campaign_start: NaiveDate::from_ymd_opt(2024, 8, 10).expect("static date is valid"),
            deadline: NaiveDate::from_ymd_opt(2025, 12, 31).expect("static date is valid"),
            // 7000 / 508, rounded
            daily_target: 13.8,
        }
    }
}

impl GoalConfig {
    /// Days from campaign start to deadline.
    pub fn total_days(&self) -> i64 {
        (self.deadline - self.campaign_start).num_days()
    }

    /// Daily pace needed over the whole campaign.
    pub fn required_daily_pace(&self) -> f64 {
        self.target_value / self.total_days().max(1) as f64
    }

    /// Days from `as_of` to the deadline, negative once it has passed.
    pub fn days_remaining(&self, as_of: NaiveDate) -> i64 {
        (self.deadline - as_of).num_days()
    }

    /// Days from campaign start to `as_of`.
    pub fn days_elapsed(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.campaign_start).num_days()
    }
}
