use anyhow::Context;
use axum::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteError, WriteFailure},
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use serde::Deserialize;

use crate::book::Book;

use super::{BookStore, StoreError};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_database() -> String {
    "store".to_string()
}

fn default_collection() -> String {
    "books".to_string()
}

/// A [`BookStore`] backed by a MongoDB collection.
///
/// The driver pools connections internally, every operation checks one out and returns it when done.
#[derive(Debug, Clone)]
pub struct MongoBookStore {
    books: Collection<Book>,
}

impl MongoBookStore {
    #[tracing::instrument(name = "mongo_connect", skip_all, fields(database = %config.database, collection = %config.collection))]
    pub async fn connect(config: &MongoConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .context("Invalid MongoDB connection string")?;

        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .context("MongoDB did not answer ping")?;

        tracing::info!("Connected");

        let store = Self {
            books: database.collection(&config.collection),
        };

        store.ensure_isbn_index().await?;

        Ok(store)
    }

    /// Creates the unique, sparse index on `isbn` unless it already exists.
    async fn ensure_isbn_index(&self) -> anyhow::Result<()> {
        let options = IndexOptions::builder().unique(true).sparse(true).build();
        let index = IndexModel::builder()
            .keys(doc! { "isbn": 1 })
            .options(options)
            .build();

        let created = self
            .books
            .create_index(index, None)
            .await
            .context("Failed to create the ISBN index")?;

        tracing::info!(index = %created.index_name, "Index ready");

        Ok(())
    }
}

fn by_isbn(isbn: &str) -> Document {
    doc! { "isbn": isbn }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    )
}

/// Maps a driver error, singling out unique index violations.
fn store_error(err: mongodb::error::Error, isbn: &str, operation: &'static str) -> StoreError {
    if is_duplicate_key(&err) {
        return StoreError::Duplicate {
            isbn: isbn.to_string(),
        };
    }

    StoreError::Backend(anyhow::Error::new(err).context(operation))
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let cursor = self
            .books
            .find(None, None)
            .await
            .context("MongoDB find failed")?;

        let books: Vec<Book> = cursor
            .try_collect()
            .await
            .context("MongoDB cursor failed")?;

        Ok(books)
    }

    async fn insert(&self, book: &Book) -> Result<(), StoreError> {
        self.books
            .insert_one(book, None)
            .await
            .map_err(|err| store_error(err, &book.isbn, "MongoDB insert_one failed"))?;

        Ok(())
    }

    async fn find(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let book = self
            .books
            .find_one(by_isbn(isbn), None)
            .await
            .context("MongoDB find_one failed")?;

        Ok(book)
    }

    async fn replace(&self, isbn: &str, book: &Book) -> Result<bool, StoreError> {
        let result = self
            .books
            .replace_one(by_isbn(isbn), book, None)
            .await
            .map_err(|err| store_error(err, &book.isbn, "MongoDB replace_one failed"))?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, isbn: &str) -> Result<bool, StoreError> {
        let result = self
            .books
            .delete_one(by_isbn(isbn), None)
            .await
            .context("MongoDB delete_one failed")?;

        Ok(result.deleted_count > 0)
    }
}
