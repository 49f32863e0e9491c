use axum::{extract::State, http::StatusCode};

use crate::{error::ErrorMessage, extractor::path::ApiPath, state::ApiState};

use super::{book_error, from_store_error, BookError, BookErrorType};

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No book with this ISBN", body = ErrorMessage),
        (status = 500, description = "The store failed", body = ErrorMessage),
    )
)]
#[tracing::instrument(skip_all, fields(isbn = %isbn))]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<StatusCode, BookError> {
    let deleted = state
        .store()
        .delete(&isbn)
        .await
        .map_err(|err| from_store_error(&state, err, "Failed to delete book"))?;

    if !deleted {
        return Err(book_error(&state, BookErrorType::NotFound { isbn }));
    }

    tracing::info!("Deleted");

    Ok(StatusCode::NO_CONTENT)
}
