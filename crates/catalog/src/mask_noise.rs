use serde::{Deserialize, Serialize};

use cropsight_core::{DomainError, DomainResult, MaskNoiseId};

/// A mask-noise profile applied during image preprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskNoise {
    pub id: MaskNoiseId,
    pub name: String,
    pub description: Option<String>,
    pub mask_type: String,
    pub noise_level: f64,
}

impl MaskNoise {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        mask_type: impl Into<String>,
        noise_level: f64,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("mask-noise name cannot be empty"));
        }
        if !(noise_level.is_finite() && noise_level >= 0.0) {
            return Err(DomainError::validation("noise level must be non-negative"));
        }
        Ok(Self {
            id: MaskNoiseId::new(),
            name,
            description,
            mask_type: mask_type.into(),
            noise_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_level_must_be_non_negative() {
        assert!(MaskNoise::new("speckle", None, "gaussian", -0.1).is_err());
        assert!(MaskNoise::new("speckle", None, "gaussian", 0.3).is_ok());
    }
}
