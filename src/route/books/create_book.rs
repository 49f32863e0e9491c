use axum::{
    extract::{OriginalUri, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::{
    book::Book,
    error::{ErrorMessage, ErrorVerbosityProvider, InternalServerError},
    extractor::json::ApiJson,
    state::ApiState,
};

use super::{from_store_error, BookError};

/// Characters that can not appear verbatim in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug)]
pub struct CreateBookResponse {
    pub location: HeaderValue,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, [(LOCATION, self.location)]).into_response()
    }
}

/// `<request-path>/<isbn>` with the ISBN encoded as a single path segment.
fn location(
    request_path: &str,
    isbn: &str,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let location = format!(
        "{}/{}",
        request_path.trim_end_matches('/'),
        utf8_percent_encode(isbn, PATH_SEGMENT)
    );

    HeaderValue::from_str(&location)
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Book,
    responses(
        (status = 201, description = "Book created", headers(("Location" = String, description = "Path of the created book"))),
        (status = 400, description = "Malformed body or ISBN already taken", body = ErrorMessage),
        (status = 500, description = "The store failed", body = ErrorMessage),
    )
)]
#[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
pub async fn create_book(
    State(state): State<ApiState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(book): ApiJson<Book>,
) -> Result<CreateBookResponse, BookError> {
    let location = location(uri.path(), &book.isbn)
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?;

    state
        .store()
        .insert(&book)
        .await
        .map_err(|err| from_store_error(&state, err, "Failed to insert book"))?;

    tracing::info!("Created");

    Ok(CreateBookResponse { location })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_appends_isbn_to_request_path() {
        assert_eq!(location("/books", "111").unwrap(), "/books/111");
        assert_eq!(location("/books/", "111").unwrap(), "/books/111");
    }

    #[test]
    fn location_encodes_isbn_as_one_segment() {
        assert_eq!(location("/books", "12/34").unwrap(), "/books/12%2F34");
        assert_eq!(location("/books", "a b?c#d").unwrap(), "/books/a%20b%3Fc%23d");
        assert_eq!(location("/books", "50%").unwrap(), "/books/50%25");
    }

    #[test]
    fn location_encodes_control_and_non_ascii_characters() {
        assert_eq!(location("/books", "11\n1").unwrap(), "/books/11%0A1");
        assert_eq!(location("/books", "é").unwrap(), "/books/%C3%A9");
    }
}
