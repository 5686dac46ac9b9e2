//! Input reference resolution.
//!
//! A job references exactly one input entity. The reference is resolved once,
//! at launch time, to confirm the row exists and to learn who owns it; it is
//! never re-validated afterwards.

use cropsight_core::{DataProductId, DomainResult, TrainingDatasetId, UserId};

/// Reference to the entity a job consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRef {
    DataProduct(DataProductId),
    TrainingDataset(TrainingDatasetId),
}

/// What launch-time resolution learned about an input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    /// Owner of the referenced entity (authorization anchor for launch).
    pub owner_id: UserId,
    /// Storage path of the backing file, when one exists.
    pub data_path: Option<String>,
    /// Data type of a training dataset, when applicable.
    pub data_type: Option<String>,
}

/// Lookup seam over the entity repositories.
///
/// Fails with `DomainError::NotFound` when the referenced row is absent.
pub trait InputDirectory: Send + Sync {
    fn resolve(&self, input: &InputRef) -> DomainResult<ResolvedInput>;
}

impl<D: InputDirectory> InputDirectory for std::sync::Arc<D> {
    fn resolve(&self, input: &InputRef) -> DomainResult<ResolvedInput> {
        (**self).resolve(input)
    }
}
