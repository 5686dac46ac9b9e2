use serde::{Deserialize, Serialize};

use cropsight_auth::Owned;
use cropsight_core::{DomainError, DomainResult, TrainingDatasetId, UserId};

/// A dataset prepared for model training.
///
/// Referenced by training jobs at launch; the reference is validated to exist
/// at launch time and never re-validated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDataset {
    pub id: TrainingDatasetId,
    pub owner_id: UserId,
    /// Storage path of the prepared data, when materialized.
    pub data_path: Option<String>,
    pub data_type: String,
    /// Fraction of rows held out for validation; strictly between 0 and 1.
    pub validation_split: f64,
}

impl TrainingDataset {
    pub const DEFAULT_VALIDATION_SPLIT: f64 = 0.2;

    pub fn new(
        owner_id: UserId,
        data_path: Option<String>,
        data_type: impl Into<String>,
        validation_split: Option<f64>,
    ) -> DomainResult<Self> {
        let data_type = data_type.into().trim().to_string();
        if data_type.is_empty() {
            return Err(DomainError::validation("data type cannot be empty"));
        }
        let validation_split = validation_split.unwrap_or(Self::DEFAULT_VALIDATION_SPLIT);
        if !(validation_split > 0.0 && validation_split < 1.0) {
            return Err(DomainError::validation(
                "validation split must be strictly between 0 and 1",
            ));
        }
        Ok(Self {
            id: TrainingDatasetId::new(),
            owner_id,
            data_path,
            data_type,
            validation_split,
        })
    }
}

impl Owned for TrainingDataset {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_defaults_and_bounds() {
        let owner = UserId::new();
        let ds = TrainingDataset::new(owner, None, "ndvi", None).unwrap();
        assert_eq!(ds.validation_split, TrainingDataset::DEFAULT_VALIDATION_SPLIT);

        assert!(TrainingDataset::new(owner, None, "ndvi", Some(0.0)).is_err());
        assert!(TrainingDataset::new(owner, None, "ndvi", Some(1.0)).is_err());
        assert!(TrainingDataset::new(owner, None, "ndvi", Some(0.3)).is_ok());
    }
}
