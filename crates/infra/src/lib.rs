//! Infrastructure layer: configuration, repositories, external processes.

pub mod config;
pub mod memory;
pub mod repos;
pub mod script;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use config::Settings;
pub use repos::{CatalogRepo, DatasetRepo, UserRepo};
pub use script::TokioScriptRunner;
