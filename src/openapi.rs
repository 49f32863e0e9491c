use axum::Router;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{book::Book, error::ErrorMessage, route::books, state::ApiState};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Book Catalog", description = "CRUD over a collection of books"),
    paths(
        books::list_books::list_books,
        books::create_book::create_book,
        books::get_book::get_book,
        books::update_book::update_book,
        books::delete_book::delete_book,
    ),
    components(schemas(Book, ErrorMessage)),
    tags((name = "books", description = "Book catalog endpoints"))
)]
pub struct ApiDoc;

/// Serves the OpenAPI document along with Swagger UI, ReDoc and RapiDoc.
pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .merge(SwaggerUi::new("/swagger-ui").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_book_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();

        assert_eq!(paths, ["/books", "/books/{isbn}"]);

        let books = &doc.paths.paths["/books"];
        assert!(books.operations.contains_key(&utoipa::openapi::path::PathItemType::Get));
        assert!(books.operations.contains_key(&utoipa::openapi::path::PathItemType::Post));

        let book = &doc.paths.paths["/books/{isbn}"];
        assert_eq!(book.operations.len(), 3);
    }
}
