//! Small descriptive statistics helpers.

/// Arithmetic mean, NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1), NaN with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Population standard deviation (n), NaN for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// Mean of the present values, NaN when none are present.
pub fn mean_present(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    let present: Vec<f64> = values.into_iter().flatten().filter(|v| !v.is_nan()).collect();
    mean(&present)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), 5.0);
        assert_eq!(population_std(&v), 2.0);
        assert!((sample_std(&v) - 2.138).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_inputs_are_nan() {
        assert!(mean(&[]).is_nan());
        assert!(sample_std(&[3.0]).is_nan());
        assert!(population_std(&[]).is_nan());
        assert!(mean_present([None, None]).is_nan());
    }

    #[test]
    fn test_mean_present_skips_missing() {
        assert_eq!(mean_present([None, Some(2.0), Some(4.0)]), 3.0);
    }
}
