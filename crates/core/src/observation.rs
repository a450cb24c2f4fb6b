//! Daily progress observations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of the tracked progress value.
///
/// Observations are ordered chronologically and are never mutated once
/// ingested. The cumulative value is expected to be non-decreasing, but
/// nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressObservation {
    /// Calendar day
    pub date: NaiveDate,

    /// Cumulative progress value
    pub progress_value: f64,

    /// Change since the previous observation, absent for the first one
    pub daily_increment: Option<f64>,

    /// ISO week number of `date`
    pub week_number: u32,

    /// Month number of `date` (1-12)
    pub month_number: u32,

    /// Goals completed that day
    pub goals_completed: u32,
}

impl ProgressObservation {
    /// Create an observation, deriving calendar fields from the date.
    pub fn new(
        date: NaiveDate,
        progress_value: f64,
        daily_increment: Option<f64>,
        goals_completed: u32,
    ) -> Self {
        Self {
            date,
            progress_value,
            daily_increment,
            week_number: date.iso_week().week(),
            month_number: date.month(),
            goals_completed,
        }
    }

    /// Create the observation following `previous`, deriving the increment.
    pub fn next(
        previous: Option<&ProgressObservation>,
        date: NaiveDate,
        progress_value: f64,
        goals_completed: u32,
    ) -> Self {
        let increment = previous.map(|p| progress_value - p.progress_value);
        Self::new(date, progress_value, increment, goals_completed)
    }
}

/// Build a chronological series from `(date, value, goals)` triples.
pub fn series_from_values(points: &[(NaiveDate, f64, u32)]) -> Vec<ProgressObservation> {
    let mut series: Vec<ProgressObservation> = Vec::with_capacity(points.len());
    for &(date, value, goals) in points {
        let obs = ProgressObservation::next(series.last(), date, value, goals);
        series.push(obs);
    }
    series
}
