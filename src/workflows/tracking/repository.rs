use super::domain::{AppliedJob, JobId};

/// Storage abstraction over the applied-jobs table so the filter and selector can run
/// against an in-memory double.
pub trait JobRepository {
    fn exists(&self, id: &JobId) -> Result<bool, RepositoryError>;
    /// Records an application stamped with the current UTC time.
    ///
    /// Returns [`RepositoryError::Conflict`] when the id is already recorded.
    fn insert(&self, title: &str, id: &JobId) -> Result<AppliedJob, RepositoryError>;
    fn find(&self, id: &JobId) -> Result<Option<AppliedJob>, RepositoryError>;
    /// All recorded applications in insertion order.
    fn list(&self) -> Result<Vec<AppliedJob>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job {0} is already recorded")]
    Conflict(JobId),
    #[error("stored record for job {id} is corrupt: {detail}")]
    CorruptRecord { id: String, detail: String },
    #[error("job store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(value: std::io::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
