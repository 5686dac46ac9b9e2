//! `cropsight-datasets` — user-owned data entities.
//!
//! Data products are uploaded imagery/products owned by a single user;
//! training datasets are the inputs model-training jobs consume. Ownership is
//! fixed at creation and is the authorization anchor for every mutation.

pub mod category;
pub mod data_product;
pub mod training;

pub use category::{Category, Product};
pub use data_product::{DataProduct, DataProductPatch};
pub use training::TrainingDataset;
