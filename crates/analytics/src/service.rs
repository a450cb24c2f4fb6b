//! Analytics service over a progress store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use goalcast_core::{AnalyticsSnapshot, ModelInsights, Prediction};
use goalcast_engine::{PredictionEngine, TrainingReport};
use goalcast_storage::ProgressStore;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::Result;
use crate::insights::model_insights;
use crate::snapshot::{compute_analytics, current_state_from_series};

/// Analytics operations for the request layer.
#[async_trait]
pub trait GoalAnalytics: Send + Sync {
    /// Full analytics snapshot for `user` as of today.
    async fn analytics(&self, user: &str) -> Result<AnalyticsSnapshot>;

    /// Retrain on the stored history. Returns whether training succeeded.
    async fn train_from_store(&self) -> Result<bool>;

    /// Training state and data quality.
    async fn insights(&self) -> Result<ModelInsights>;
}

/// Joins a [`ProgressStore`] with a shared [`PredictionEngine`].
pub struct AnalyticsService<S: ProgressStore> {
    store: Arc<Mutex<S>>,
    engine: Arc<PredictionEngine>,
}

impl<S: ProgressStore> AnalyticsService<S> {
    /// Create a service over `store` using `engine`.
    pub fn new(store: S, engine: Arc<PredictionEngine>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            engine,
        }
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// The engine used for predictions.
    pub fn engine(&self) -> &Arc<PredictionEngine> {
        &self.engine
    }

    /// Analytics snapshot for `user` as of `as_of`.
    pub async fn analytics_as_of(&self, user: &str, as_of: NaiveDate) -> Result<AnalyticsSnapshot> {
        let (series, goal_data) = {
            let store = self.store.lock().await;
            (store.get_progress_series().await?, store.goal_data(user, as_of).await?)
        };
        Ok(compute_analytics(&self.engine, &series, &goal_data, as_of))
    }

    /// Prediction for `user`'s current state as of `as_of`.
    pub async fn prediction_as_of(&self, user: &str, as_of: NaiveDate) -> Result<Prediction> {
        let (series, completed) = {
            let store = self.store.lock().await;
            (
                store.get_progress_series().await?,
                store.count_goals_completed_this_week(user, as_of).await?,
            )
        };
        let state = current_state_from_series(&series, self.engine.goal(), completed, as_of);
        Ok(self.engine.predict(&state, as_of))
    }

    /// Retrain on the stored history, failing when training is declined.
    pub async fn train_report(&self) -> Result<TrainingReport> {
        let series = self.store.lock().await.get_progress_series().await?;
        Ok(self.engine.try_train(&series, chrono::Utc::now())?)
    }
}

#[async_trait]
impl<S: ProgressStore> GoalAnalytics for AnalyticsService<S> {
    async fn analytics(&self, user: &str) -> Result<AnalyticsSnapshot> {
        self.analytics_as_of(user, today()).await
    }

    async fn train_from_store(&self) -> Result<bool> {
        let series = self.store.lock().await.get_progress_series().await?;
        let trained = self.engine.train(&series, chrono::Utc::now());
        if trained {
            info!("Models retrained on {} observations", series.len());
        } else {
            warn!("Models not retrained; predictions use the pace projection");
        }
        Ok(trained)
    }

    async fn insights(&self) -> Result<ModelInsights> {
        let series = self.store.lock().await.get_progress_series().await?;
        Ok(model_insights(&self.engine, &series))
    }
}

/// Local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
