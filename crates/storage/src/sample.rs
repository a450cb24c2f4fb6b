//! Seeded demo history for empty stores.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use goalcast_core::ProgressObservation;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Normal, Poisson};

use crate::trait_::{Result, StorageError};

/// Progress value of the first generated day.
pub const SAMPLE_START_VALUE: f64 = 50.0;

/// Mean simulated daily increment.
pub const SAMPLE_DAILY_MEAN: f64 = 13.8;

/// Std-dev of the simulated daily increment.
pub const SAMPLE_DAILY_STD: f64 = 3.0;

/// Mean number of goals completed on a Sunday.
pub const SAMPLE_SUNDAY_GOALS: f64 = 1.0;

/// Generate one observation per day from `start` to `end` inclusive.
///
/// Increments are drawn from a normal distribution (clamped at 0) and
/// goals are only completed on Sundays, Poisson(1) distributed.
pub fn generate_history(start: NaiveDate, end: NaiveDate, seed: u64) -> Result<Vec<ProgressObservation>> {
    if end < start {
        return Ok(Vec::new());
    }

    let increments = Normal::new(SAMPLE_DAILY_MEAN, SAMPLE_DAILY_STD)
        .map_err(|e| StorageError::Sampling(e.to_string()))?;
    let sunday_goals =
        Poisson::new(SAMPLE_SUNDAY_GOALS).map_err(|e| StorageError::Sampling(e.to_string()))?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut series: Vec<ProgressObservation> = Vec::new();
    let mut progress = SAMPLE_START_VALUE;

    for i in 0..=(end - start).num_days() {
        let day = start + Duration::days(i);
        let increment = rng.sample(increments).max(0.0);
        progress += increment;

        let goals = if day.weekday() == Weekday::Sun {
            rng.sample::<f64, _>(sunday_goals) as u32
        } else {
            0
        };

        let obs = ProgressObservation::next(series.last(), day, progress, goals);
        series.push(obs);
    }

    tracing::debug!(days = series.len(), seed, "Generated sample history");
    Ok(series)
}
