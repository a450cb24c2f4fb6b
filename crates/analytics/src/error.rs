//! Analytics errors.

use goalcast_engine::EngineError;
use goalcast_storage::StorageError;

/// Result alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors surfaced by the analytics service.
///
/// Computation problems never appear here; they degrade to tagged results.
/// Only store failures and explicit training requests can fail.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Reading from the store failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Training was requested and declined
    #[error("training failed: {0}")]
    Training(#[from] EngineError),
}
