use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    book::Book, error::ErrorMessage, extractor::path::ApiPath, response::JsonBody,
    state::ApiState,
};

use super::{book_error, from_store_error, BookError, BookErrorType};

#[derive(Debug)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, JsonBody::pretty(self.book)).into_response()
    }
}

/// Get a book by its ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "No book with this ISBN", body = ErrorMessage),
        (status = 500, description = "The store failed", body = ErrorMessage),
    )
)]
#[tracing::instrument(skip_all, fields(isbn = %isbn))]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<GetBookResponse, BookError> {
    let book = state
        .store()
        .find(&isbn)
        .await
        .map_err(|err| from_store_error(&state, err, "Failed to find book"))?;

    match book {
        Some(book) => Ok(GetBookResponse { book }),
        None => Err(book_error(&state, BookErrorType::NotFound { isbn })),
    }
}
