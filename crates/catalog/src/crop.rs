use serde::{Deserialize, Serialize};

use cropsight_core::{CropId, DomainError, DomainResult};

/// A crop species tracked by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub id: CropId,
    pub name: String,
    pub description: Option<String>,
    /// Growth period in days.
    pub growth_period_days: Option<u32>,
    /// Water requirements in mm per season.
    pub water_requirements: Option<f64>,
}

impl Crop {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        growth_period_days: Option<u32>,
        water_requirements: Option<f64>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("crop name cannot be empty"));
        }
        Ok(Self {
            id: CropId::new(),
            name,
            description,
            growth_period_days,
            water_requirements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_required() {
        let crop = Crop::new("  wheat  ", None, Some(120), None).unwrap();
        assert_eq!(crop.name, "wheat");

        assert!(Crop::new("   ", None, None, None).is_err());
    }
}
