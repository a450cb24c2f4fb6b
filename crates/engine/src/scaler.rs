//! Column standardization fitted on the training split.

use goalcast_core::FEATURE_COUNT;

use crate::models::Row;

/// Relative spread below which a column counts as constant.
const MIN_RELATIVE_STD: f64 = 1e-12;

/// Per-column zero mean, unit variance transform.
///
/// Uses the population variance. Columns without variance are only
/// centered.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Fit column statistics on `rows`.
    pub fn fit(rows: &[Row]) -> Self {
        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for col in 0..FEATURE_COUNT {
            let m = rows.iter().map(|r| r[col]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[col] - m).powi(2)).sum::<f64>() / n;
            mean[col] = m;
            let std = var.sqrt();
            if std.is_finite() && std > MIN_RELATIVE_STD * m.abs().max(1.0) {
                scale[col] = std;
            }
        }
        Self { mean, scale }
    }

    /// Standardize one row.
    pub fn transform(&self, row: &Row) -> Row {
        let mut out = [0.0; FEATURE_COUNT];
        for col in 0..FEATURE_COUNT {
            out[col] = (row[col] - self.mean[col]) / self.scale[col];
        }
        out
    }

    /// Standardize many rows.
    pub fn transform_all(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter().map(|r| self.transform(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_transform() {
        let rows = vec![[1.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0], [3.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0]];
        let scaler = StandardScaler::fit(&rows);
        let t = scaler.transform_all(&rows);
        assert_eq!(t[0][0], -1.0);
        assert_eq!(t[1][0], 1.0);
        // Constant column is centered, not divided by zero.
        assert_eq!(t[0][1], 0.0);
    }

    #[test]
    fn test_statistics_are_reused() {
        let train = vec![[0.0; FEATURE_COUNT], [2.0; FEATURE_COUNT]];
        let scaler = StandardScaler::fit(&train);
        let t = scaler.transform(&[4.0; FEATURE_COUNT]);
        assert!(t.iter().all(|v| *v == 3.0));
    }
}
