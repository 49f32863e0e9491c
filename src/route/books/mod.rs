use axum::http::StatusCode;
use serde::Serialize;

use crate::{
    error::{
        ErrorVerbosityProvider, HandlerError, InternalServerError, ResourceError,
        ResourceErrorProvider,
    },
    state::ApiState,
    store::StoreError,
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;


#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        isbn: String,
    },
    AlreadyExists {
        #[serde(skip)]
        isbn: String,
    },
    IsbnMismatch {
        #[serde(skip)]
        path_isbn: String,
        #[serde(skip)]
        body_isbn: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            BookErrorType::AlreadyExists { .. } => StatusCode::BAD_REQUEST,
            BookErrorType::IsbnMismatch { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
            BookErrorType::AlreadyExists { .. } => "Book with ISBN already exists",
            BookErrorType::IsbnMismatch { .. } => "ISBN in body does not match path",
        }
    }

    fn context(&self) -> Self::Context {
        let reason = match self {
            BookErrorType::NotFound { isbn } => format!("Book with ISBN `{isbn}` not found"),
            BookErrorType::AlreadyExists { isbn } => {
                format!("Book with ISBN `{isbn}` already exists")
            }
            BookErrorType::IsbnMismatch {
                path_isbn,
                body_isbn,
            } => format!("Path ISBN `{path_isbn}` differs from body ISBN `{body_isbn}`"),
        };

        BookErrorContext { reason }
    }
}

pub type BookError = HandlerError<BookErrorType>;

fn book_error(state: &ApiState, error_type: BookErrorType) -> BookError {
    ResourceError::new(state.error_verbosity(), error_type).into()
}

/// Duplicates are reported to the client, everything else is an internal server error.
fn from_store_error(state: &ApiState, err: StoreError, operation: &'static str) -> BookError {
    match err {
        StoreError::Duplicate { isbn } => book_error(state, BookErrorType::AlreadyExists { isbn }),
        StoreError::Backend(err) => {
            InternalServerError::from_generic_error(state.error_verbosity(), err.context(operation))
                .into()
        }
    }
}
