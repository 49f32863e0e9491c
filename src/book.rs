use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single record of the catalog.
///
/// `isbn` is the lookup key and is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct Book {
    #[schema(example = "978-0-316-76948-0")]
    pub isbn: String,
    #[schema(example = "The Catcher in the Rye")]
    pub title: String,
    /// Free text, not a list.
    #[schema(example = "J.D. Salinger")]
    pub authors: String,
    /// Formatted currency text.
    #[schema(example = "$9.99")]
    pub price: String,
}
