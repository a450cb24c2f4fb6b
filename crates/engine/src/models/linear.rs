//! Ordinary least squares with intercept.

use goalcast_core::FEATURE_COUNT;

use super::{Regressor, Row};
use crate::error::{EngineError, Result};

/// Pivots smaller than this mark a singular system.
const PIVOT_EPSILON: f64 = 1e-12;

/// Linear regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearModel {
    /// Solve the centered normal equations with a small ridge term on the
    /// diagonal.
    pub fn fit(rows: &[Row], targets: &[f64], ridge: f64) -> Result<Self> {
        if rows.is_empty() || rows.len() != targets.len() {
            return Err(EngineError::Numerical(format!(
                "cannot fit {} rows against {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let n = rows.len() as f64;
        let mut x_mean = [0.0; FEATURE_COUNT];
        for row in rows {
            for (m, v) in x_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let y_mean = targets.iter().sum::<f64>() / n;

        // Augmented matrix [X'X + ridge I | X'y]
        let mut a = [[0.0; FEATURE_COUNT + 1]; FEATURE_COUNT];
        for (row, y) in rows.iter().zip(targets) {
            let yc = y - y_mean;
            for i in 0..FEATURE_COUNT {
                let xi = row[i] - x_mean[i];
                for j in 0..FEATURE_COUNT {
                    a[i][j] += xi * (row[j] - x_mean[j]);
                }
                a[i][FEATURE_COUNT] += xi * yc;
            }
        }
        for (i, r) in a.iter_mut().enumerate() {
            r[i] += ridge;
        }

        let coefficients = solve(a)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        if !intercept.is_finite() {
            return Err(EngineError::Numerical("non-finite intercept".to_string()));
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Fitted coefficients in feature order.
    pub fn coefficients(&self) -> &[f64; FEATURE_COUNT] {
        &self.coefficients
    }

    /// Fitted intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearModel {
    fn predict_row(&self, row: &Row) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: [[f64; FEATURE_COUNT + 1]; FEATURE_COUNT]) -> Result<[f64; FEATURE_COUNT]> {
    for col in 0..FEATURE_COUNT {
        let pivot_row = (col..FEATURE_COUNT)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row][col].abs();
        if pivot.is_nan() || pivot < PIVOT_EPSILON {
            return Err(EngineError::Numerical(format!(
                "singular system at column {col}"
            )));
        }
        a.swap(col, pivot_row);

        for r in col + 1..FEATURE_COUNT {
            let factor = a[r][col] / a[col][col];
            for c in col..=FEATURE_COUNT {
                a[r][c] -= factor * a[col][c];
            }
        }
    }

    let mut x = [0.0; FEATURE_COUNT];
    for i in (0..FEATURE_COUNT).rev() {
        let tail: f64 = (i + 1..FEATURE_COUNT).map(|j| a[i][j] * x[j]).sum();
        x[i] = (a[i][FEATURE_COUNT] - tail) / a[i][i];
    }
    Ok(x)
}
