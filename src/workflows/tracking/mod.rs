//! Durable record of the jobs the operator has applied to.

pub mod domain;
pub mod repository;
mod sqlite;

pub use domain::{AppliedJob, JobId};
pub use repository::{JobRepository, RepositoryError};
pub use sqlite::{with_fresh_store, with_store, SqliteJobStore};
