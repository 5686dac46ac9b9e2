use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cropsight_auth::Owned;
use cropsight_core::{DataProductId, DomainError, DomainResult, UserId};

/// A user-owned data product (uploaded imagery or derived artifact).
///
/// `owner_id` is set at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProduct {
    pub id: DataProductId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub file_type: Option<String>,
    /// Storage path of the backing file, once one has been attached.
    pub file_path: Option<String>,
    pub size_bytes: Option<u64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by the owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl DataProduct {
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        description: Option<String>,
        file_type: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("data product name cannot be empty"));
        }
        let now = Utc::now();
        Ok(Self {
            id: DataProductId::new(),
            owner_id,
            name,
            description,
            file_type,
            file_path: None,
            size_bytes: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an owner-initiated patch. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: DataProductPatch) -> DomainResult<()> {
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("data product name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record an attached file.
    pub fn attach_file(&mut self, path: impl Into<String>, file_type: Option<String>, size_bytes: u64) {
        self.file_path = Some(path.into());
        self.file_type = file_type;
        self.size_bytes = Some(size_bytes);
        self.updated_at = Utc::now();
    }
}

impl Owned for DataProduct {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_keeps_unset_fields() {
        let owner = UserId::new();
        let mut dp = DataProduct::new(owner, "field-7", Some("north".into()), None).unwrap();

        dp.apply(DataProductPatch {
            name: Some("field-7b".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(dp.name, "field-7b");
        assert_eq!(dp.description.as_deref(), Some("north"));
        assert!(dp.is_active);
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut dp = DataProduct::new(UserId::new(), "field-7", None, None).unwrap();
        let err = dp
            .apply(DataProductPatch {
                name: Some("  ".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
