//! Model and data diagnostics.

use goalcast_core::{
    finite_or, DataQuality, ModelInsights, PredictionAccuracy, ProgressObservation, FEATURE_NAMES,
};
use goalcast_engine::stats::{mean, sample_std};
use goalcast_engine::PredictionEngine;

/// Outliers are only counted with more observations than this.
const OUTLIER_MIN_OBSERVATIONS: usize = 10;

/// Increments this many std-devs above the mean are outliers.
const OUTLIER_SIGMA: f64 = 3.0;

/// Training state of `engine` and quality figures of `series`.
pub fn model_insights(engine: &PredictionEngine, series: &[ProgressObservation]) -> ModelInsights {
    let snapshot = engine.snapshot();
    let trained = snapshot.trained.as_ref();

    ModelInsights {
        is_trained: trained.is_some(),
        best_model: trained.map(|t| t.best_model),
        model_scores: trained.map(|t| t.r2_scores()).unwrap_or_default(),
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        prediction_accuracy: if trained.is_some() {
            PredictionAccuracy::High
        } else {
            PredictionAccuracy::Limited
        },
        data_quality: data_quality(series),
    }
}

/// Size, spread and outlier count of the daily increments.
pub fn data_quality(series: &[ProgressObservation]) -> DataQuality {
    let increments: Vec<f64> = series
        .iter()
        .filter_map(|o| o.daily_increment)
        .filter(|v| v.is_finite())
        .collect();
    let std = finite_or(sample_std(&increments), 0.0);

    let outliers_detected = if series.len() > OUTLIER_MIN_OBSERVATIONS {
        let limit = mean(&increments) + OUTLIER_SIGMA * std;
        increments.iter().filter(|v| **v > limit).count()
    } else {
        0
    };

    DataQuality {
        total_days: series.len(),
        increment_std: std,
        outliers_detected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use goalcast_core::{GoalConfig, ModelKind};
    use goalcast_engine::EngineConfig;

    fn series(increments: &[f64]) -> Vec<ProgressObservation> {
        let start = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();
        let mut value = 50.0;
        let mut out = vec![ProgressObservation::new(start, value, None, 0)];
        for (i, inc) in increments.iter().enumerate() {
            value += inc;
            out.push(ProgressObservation::new(
                start + Duration::days(i as i64 + 1),
                value,
                Some(*inc),
                0,
            ));
        }
        out
    }

    #[test]
    fn test_untrained_insights() {
        let engine = PredictionEngine::new(GoalConfig::default());
        let insights = model_insights(&engine, &[]);
        assert!(!insights.is_trained);
        assert_eq!(insights.best_model, None);
        assert!(insights.model_scores.is_empty());
        assert_eq!(insights.prediction_accuracy, PredictionAccuracy::Limited);
        assert_eq!(insights.feature_names.len(), 7);
        assert_eq!(insights.data_quality.total_days, 0);
        assert_eq!(insights.data_quality.increment_std, 0.0);
    }

    #[test]
    fn test_trained_insights() {
        let engine = PredictionEngine::new(GoalConfig::default()).with_config(EngineConfig {
            n_estimators: 10,
            ..Default::default()
        });
        let incs: Vec<f64> = (0..30).map(|i| 12.0 + (i % 4) as f64).collect();
        let s = series(&incs);
        assert!(engine.train(&s, chrono::Utc::now()));

        let insights = model_insights(&engine, &s);
        assert!(insights.is_trained);
        assert_eq!(insights.prediction_accuracy, PredictionAccuracy::High);
        assert_eq!(insights.model_scores.len(), 3);
        assert!(insights.model_scores.contains_key(&ModelKind::Linear));
        assert_eq!(insights.data_quality.total_days, 31);
    }

    #[test]
    fn test_outlier_detection() {
        let mut incs = vec![10.0; 20];
        incs.push(100.0);
        let quality = data_quality(&series(&incs));
        assert_eq!(quality.outliers_detected, 1);
        assert!(quality.increment_std > 0.0);
    }

    #[test]
    fn test_short_series_has_no_outliers() {
        let quality = data_quality(&series(&[10.0, 10.0, 10.0, 500.0]));
        assert_eq!(quality.outliers_detected, 0);
        assert_eq!(quality.total_days, 5);
    }
}
