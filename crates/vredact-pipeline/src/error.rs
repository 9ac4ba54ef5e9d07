//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Terminal job failures, one variant per error category.
///
/// None of these are retried automatically; every category surfaces to
/// the caller with the underlying diagnostic attached.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Interval error: {0}")]
    Interval(#[from] vredact_models::IntervalError),

    #[error("Transcoder error: {0}")]
    Media(#[from] vredact_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] vredact_storage::StorageError),

    #[error("Lock store error: {0}")]
    LockStore(#[from] vredact_locks::LockStoreError),

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    /// Whether the failure is an unknown-content / missing-object lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::Storage(vredact_storage::StorageError::NotFound(_))
                | PipelineError::LockStore(vredact_locks::LockStoreError::NotFound(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err: PipelineError = vredact_locks::LockStoreError::not_found("abc").into();
        assert!(err.is_not_found());

        let err: PipelineError = vredact_storage::StorageError::not_found("key").into();
        assert!(err.is_not_found());

        assert!(!PipelineError::job_failed("boom").is_not_found());
    }
}
