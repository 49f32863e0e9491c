use axum::async_trait;
use tokio::sync::RwLock;

use crate::book::Book;

use super::{BookStore, StoreError};

/// A process local [`BookStore`] keeping books in insertion order.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn insert(&self, book: &Book) -> Result<(), StoreError> {
        let mut books = self.books.write().await;

        if books.iter().any(|stored| stored.isbn == book.isbn) {
            return Err(StoreError::Duplicate {
                isbn: book.isbn.clone(),
            });
        }

        books.push(book.clone());

        Ok(())
    }

    async fn find(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let books = self.books.read().await;

        Ok(books.iter().find(|book| book.isbn == isbn).cloned())
    }

    async fn replace(&self, isbn: &str, book: &Book) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;

        let Some(index) = books.iter().position(|stored| stored.isbn == isbn) else {
            return Ok(false);
        };

        let taken = books
            .iter()
            .enumerate()
            .any(|(i, stored)| i != index && stored.isbn == book.isbn);

        if taken {
            return Err(StoreError::Duplicate {
                isbn: book.isbn.clone(),
            });
        }

        books[index] = book.clone();

        Ok(true)
    }

    async fn delete(&self, isbn: &str) -> Result<bool, StoreError> {
        let mut books = self.books.write().await;

        let Some(index) = books.iter().position(|book| book.isbn == isbn) else {
            return Ok(false);
        };

        books.remove(index);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: "X".to_string(),
            price: "$1".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_isbn() {
        let store = MemoryBookStore::new();

        store.insert(&book("111", "A")).await.unwrap();
        let err = store.insert(&book("111", "B")).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { isbn } if isbn == "111"));
        assert_eq!(store.list().await.unwrap(), vec![book("111", "A")]);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = MemoryBookStore::new();

        store.insert(&book("222", "B")).await.unwrap();
        store.insert(&book("111", "A")).await.unwrap();

        let isbns: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.isbn)
            .collect();

        assert_eq!(isbns, ["222", "111"]);
    }

    #[tokio::test]
    async fn empty_isbn_is_a_regular_key() {
        let store = MemoryBookStore::new();

        assert_eq!(store.find("").await.unwrap(), None);

        store.insert(&book("", "Untitled")).await.unwrap();

        assert_eq!(store.find("").await.unwrap(), Some(book("", "Untitled")));
    }

    #[tokio::test]
    async fn replace_missing_book_inserts_nothing() {
        let store = MemoryBookStore::new();

        assert!(!store.replace("999", &book("999", "A")).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_onto_taken_isbn_fails() {
        let store = MemoryBookStore::new();

        store.insert(&book("111", "A")).await.unwrap();
        store.insert(&book("222", "B")).await.unwrap();

        let err = store.replace("111", &book("222", "C")).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(store.find("111").await.unwrap(), Some(book("111", "A")));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_book_was_removed() {
        let store = MemoryBookStore::new();

        store.insert(&book("111", "A")).await.unwrap();

        assert!(store.delete("111").await.unwrap());
        assert!(!store.delete("111").await.unwrap());
        assert_eq!(store.find("111").await.unwrap(), None);
    }
}
