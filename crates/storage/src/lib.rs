#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;
pub mod sqlite;

pub use catalog::{CatalogError, ChapterCatalog};
pub use repository::{DifficultWords, Storage, StorageError};
