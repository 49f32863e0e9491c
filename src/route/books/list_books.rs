use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    book::Book,
    error::{ApiError, ErrorMessage, ErrorVerbosityProvider, InternalServerError},
    response::JsonBody,
    state::ApiState,
};

#[derive(Debug)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, JsonBody::pretty(self.books)).into_response()
    }
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Every book in the catalog", body = [Book]),
        (status = 500, description = "The store failed", body = ErrorMessage),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_books(State(state): State<ApiState>) -> Result<ListBooksResponse, ApiError> {
    let books = state.store().list().await.map_err(|err| {
        InternalServerError::from_generic_error(
            state.error_verbosity(),
            anyhow::Error::from(err).context("Failed to list books"),
        )
    })?;

    tracing::debug!(count = books.len(), "Listed");

    Ok(ListBooksResponse { books })
}
