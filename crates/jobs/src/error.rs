//! Error type shared by the job service components.

use cropsight_core::DomainError;

use crate::store::JobStoreError;

/// Failure of a launch/status/update/delete operation.
///
/// Domain failures (`NotFound`, `Forbidden`, validation) surface synchronously
/// to the caller. Execution failures never appear here: they are recorded
/// into the job record and observed via the status reporter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("job store failure: {0}")]
    Store(#[from] JobStoreError),
}
