use std::sync::Arc;

use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;

use crate::book::Book;

pub mod memory;
pub mod mongo;

pub use memory::MemoryBookStore;
pub use mongo::{MongoBookStore, MongoConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Book with ISBN `{isbn}` already exists")]
    Duplicate { isbn: String },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence of [`Book`]s keyed by their ISBN.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns every book in the store.
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Inserts a new book. Fails with [`StoreError::Duplicate`] if the ISBN is taken.
    async fn insert(&self, book: &Book) -> Result<(), StoreError>;

    async fn find(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Replaces the book stored under `isbn`.
    ///
    /// Returns `false` if no book matched, nothing is inserted in that case.
    async fn replace(&self, isbn: &str, book: &Book) -> Result<bool, StoreError>;

    /// Returns `true` if the book existed and was deleted, `false` otherwise.
    async fn delete(&self, isbn: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    Mongo(MongoConfig),
    Memory,
}

impl StoreConfig {
    /// Connects to the configured backend.
    ///
    /// For MongoDB this also makes sure the unique ISBN index exists.
    pub async fn connect(&self) -> anyhow::Result<Arc<dyn BookStore>> {
        match self {
            StoreConfig::Mongo(config) => {
                let store = MongoBookStore::connect(config)
                    .await
                    .context("Failed to connect to MongoDB")?;

                Ok(Arc::new(store))
            }
            StoreConfig::Memory => {
                tracing::warn!("Using the in-memory store, books are lost on shutdown");

                Ok(Arc::new(MemoryBookStore::new()))
            }
        }
    }
}
