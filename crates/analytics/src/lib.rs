//! Goalcast analytics.
//!
//! Weekly, trend and KPI summaries of the progress history, combined with
//! the engine's prediction into one snapshot per request.

#![warn(missing_docs)]

mod error;
pub mod insights;
pub mod kpi;
pub mod service;
pub mod snapshot;
pub mod trend;
pub mod weekly;

pub use error::{AnalyticsError, Result};
pub use insights::{data_quality, model_insights};
pub use kpi::{goal_completion_rate, kpi_analysis};
pub use service::{today, AnalyticsService, GoalAnalytics};
pub use snapshot::{compute_analytics, current_state_from_series};
pub use trend::trend_analysis;
pub use weekly::weekly_performance;
