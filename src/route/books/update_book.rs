use axum::{extract::State, http::StatusCode};

use crate::{
    book::Book,
    error::ErrorMessage,
    extractor::{json::ApiJson, path::ApiPath},
    state::ApiState,
};

use super::{book_error, from_store_error, BookError, BookErrorType};

/// Replace a book
///
/// The body replaces the stored book entirely. Its ISBN must match the one in the path.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    request_body = Book,
    responses(
        (status = 204, description = "Book replaced"),
        (status = 400, description = "Malformed body or ISBN mismatch", body = ErrorMessage),
        (status = 404, description = "No book with this ISBN", body = ErrorMessage),
        (status = 500, description = "The store failed", body = ErrorMessage),
    )
)]
#[tracing::instrument(skip_all, fields(isbn = %isbn))]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
    ApiJson(book): ApiJson<Book>,
) -> Result<StatusCode, BookError> {
    if book.isbn != isbn {
        return Err(book_error(
            &state,
            BookErrorType::IsbnMismatch {
                path_isbn: isbn,
                body_isbn: book.isbn,
            },
        ));
    }

    let replaced = state
        .store()
        .replace(&isbn, &book)
        .await
        .map_err(|err| from_store_error(&state, err, "Failed to replace book"))?;

    if !replaced {
        return Err(book_error(&state, BookErrorType::NotFound { isbn }));
    }

    tracing::info!("Replaced");

    Ok(StatusCode::NO_CONTENT)
}
