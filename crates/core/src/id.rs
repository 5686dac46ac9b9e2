//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $t:ident) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", stringify!($t), e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a user (actor identity and ownership anchor).
    UserId
);
uuid_id!(
    /// Identifier of a crop in the reference catalog.
    CropId
);
uuid_id!(
    /// Identifier of a satellite in the reference catalog.
    SatelliteId
);
uuid_id!(
    /// Identifier of a polarization channel of a satellite.
    PolarizationId
);
uuid_id!(
    /// Identifier of a crop/satellite calibration entry.
    CalibrationId
);
uuid_id!(
    /// Identifier of a mask-noise profile.
    MaskNoiseId
);
uuid_id!(
    /// Identifier of a data-product category.
    CategoryId
);
uuid_id!(
    /// Identifier of a product within a category.
    ProductId
);
uuid_id!(
    /// Identifier of a user-owned data product.
    DataProductId
);
uuid_id!(
    /// Identifier of a training dataset.
    TrainingDatasetId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = "not-a-uuid".parse::<CropId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }
}
