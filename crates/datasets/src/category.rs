use serde::{Deserialize, Serialize};

use cropsight_core::{CategoryId, DomainError, DomainResult, ProductId};

/// A grouping of related products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(Self {
            id: CategoryId::new(),
            name,
            description,
        })
    }
}

/// A product offered within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: CategoryId,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        category_id: CategoryId,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        Ok(Self {
            id: ProductId::new(),
            name,
            description,
            category_id,
        })
    }
}
