use cropsight_core::{
    CategoryId, DataProductId, DomainError, DomainResult, ProductId, TrainingDatasetId, UserId,
};
use cropsight_datasets::{Category, DataProduct, Product, TrainingDataset};
use cropsight_jobs::{InputDirectory, InputRef, ResolvedInput};

use crate::memory::Table;

/// User-owned data storage: data products, categories, products, training
/// datasets. Doubles as the launch-time input directory for the job system.
#[derive(Debug, Default)]
pub struct DatasetRepo {
    data_products: Table<DataProductId, DataProduct>,
    categories: Table<CategoryId, Category>,
    products: Table<ProductId, Product>,
    training_datasets: Table<TrainingDatasetId, TrainingDataset>,
}

impl DatasetRepo {
    pub fn new() -> Self {
        Self::default()
    }

    // Data products

    pub fn insert_data_product(&self, product: DataProduct) {
        self.data_products.insert(product.id, product);
    }

    pub fn get_data_product(&self, id: DataProductId) -> DomainResult<DataProduct> {
        self.data_products
            .get(&id)
            .ok_or(DomainError::NotFound("data product"))
    }

    pub fn list_data_products(&self, owner: UserId) -> Vec<DataProduct> {
        let mut rows = self.data_products.filtered(|d| d.owner_id == owner);
        rows.sort_by_key(|d| d.created_at);
        rows
    }

    pub fn update_data_product(&self, product: &DataProduct) -> DomainResult<()> {
        if !self.data_products.contains(&product.id) {
            return Err(DomainError::NotFound("data product"));
        }
        self.data_products.insert(product.id, product.clone());
        Ok(())
    }

    pub fn remove_data_product(&self, id: DataProductId) -> DomainResult<()> {
        self.data_products
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound("data product"))
    }

    // Categories and products

    pub fn insert_category(&self, category: Category) {
        self.categories.insert(category.id, category);
    }

    pub fn category_exists(&self, id: CategoryId) -> bool {
        self.categories.contains(&id)
    }

    pub fn list_categories(&self) -> Vec<Category> {
        let mut rows = self.categories.all();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Store a product; its category must exist.
    pub fn insert_product(&self, product: Product) -> DomainResult<()> {
        if !self.category_exists(product.category_id) {
            return Err(DomainError::NotFound("category"));
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    pub fn list_products(&self, category_id: Option<CategoryId>) -> Vec<Product> {
        let mut rows = self
            .products
            .filtered(|p| category_id.is_none_or(|c| p.category_id == c));
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    // Training datasets

    pub fn insert_training_dataset(&self, dataset: TrainingDataset) {
        self.training_datasets.insert(dataset.id, dataset);
    }

    pub fn get_training_dataset(&self, id: TrainingDatasetId) -> DomainResult<TrainingDataset> {
        self.training_datasets
            .get(&id)
            .ok_or(DomainError::NotFound("training dataset"))
    }

    pub fn list_training_datasets(&self, owner: UserId) -> Vec<TrainingDataset> {
        self.training_datasets.filtered(|d| d.owner_id == owner)
    }
}

impl InputDirectory for DatasetRepo {
    fn resolve(&self, input: &InputRef) -> DomainResult<ResolvedInput> {
        match input {
            InputRef::DataProduct(id) => {
                let product = self.get_data_product(*id)?;
                Ok(ResolvedInput {
                    owner_id: product.owner_id,
                    data_path: product.file_path,
                    data_type: product.file_type,
                })
            }
            InputRef::TrainingDataset(id) => {
                let dataset = self.get_training_dataset(*id)?;
                Ok(ResolvedInput {
                    owner_id: dataset.owner_id,
                    data_path: dataset.data_path,
                    data_type: Some(dataset.data_type),
                })
            }
        }
    }
}
