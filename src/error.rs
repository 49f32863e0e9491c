use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::response::JsonBody;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns an empty response with [`StatusCode::NO_CONTENT`] for all errors.
    None,
    /// Server returns only the appropriate status code.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    #[default]
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Body of every error response.
///
/// With [`ErrorVerbosity::Message`] only `message` is rendered.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "Book not found")]
    pub message: String,
}

/// Renders an error according to its verbosity.
///
/// `typed` is the full serializable error, used for [`ErrorVerbosity::Type`] and [`ErrorVerbosity::Full`].
fn render_error<T: Serialize>(
    verbosity: ErrorVerbosity,
    status_code: StatusCode,
    message: &'static str,
    typed: T,
) -> Response {
    match verbosity {
        ErrorVerbosity::None => StatusCode::NO_CONTENT.into_response(),
        ErrorVerbosity::StatusCode => status_code.into_response(),
        ErrorVerbosity::Message => {
            let body = ErrorMessage {
                message: message.to_string(),
            };

            (status_code, JsonBody::new(body)).into_response()
        }
        ErrorVerbosity::Type | ErrorVerbosity::Full => {
            (status_code, JsonBody::new(typed)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested resource is not found.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let verbosity = self.verbosity();
        let status_code = self.status_code();
        let message = self.message();

        render_error(
            verbosity,
            status_code,
            message,
            ApiErrorResponse {
                error: self,
                message,
            },
        )
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

/// Describes an error that belongs to a single resource, e.g. a missing book.
pub trait ResourceErrorProvider {
    type Context: Serialize;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> Self::Context;
}

#[derive(Debug, Serialize)]
struct ResourceErrorResponse<T, C> {
    #[serde(flatten)]
    error_type: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<C>,
    message: &'static str,
}

/// A resource specific error rendered according to the [`ErrorVerbosity`].
#[derive(Debug)]
pub struct ResourceError<T> {
    verbosity: ErrorVerbosity,
    error_type: T,
}

impl<T> ResourceError<T> {
    pub fn new(verbosity: ErrorVerbosity, error_type: T) -> Self {
        ResourceError {
            verbosity,
            error_type,
        }
    }
}

impl<T> IntoResponse for ResourceError<T>
where
    T: ResourceErrorProvider + Serialize,
{
    fn into_response(self) -> Response {
        let status_code = self.error_type.status_code();
        let message = self.error_type.message();
        let error = self
            .verbosity
            .should_generate_error_reason()
            .then(|| self.error_type.context());

        render_error(
            self.verbosity,
            status_code,
            message,
            ResourceErrorResponse {
                error_type: self.error_type,
                error,
                message,
            },
        )
    }
}

/// Error returned by resource handlers.
///
/// Either a generic [`ApiError`] or a [`ResourceError`] specific to the resource.
#[derive(Debug)]
pub enum HandlerError<T> {
    Api(ApiError),
    Resource(ResourceError<T>),
}

impl<T> From<ApiError> for HandlerError<T> {
    fn from(err: ApiError) -> Self {
        HandlerError::Api(err)
    }
}

impl<T> From<InternalServerError> for HandlerError<T> {
    fn from(err: InternalServerError) -> Self {
        HandlerError::Api(err.into())
    }
}

impl<T> From<ResourceError<T>> for HandlerError<T> {
    fn from(err: ResourceError<T>) -> Self {
        HandlerError::Resource(err)
    }
}

impl<T> IntoResponse for HandlerError<T>
where
    T: ResourceErrorProvider + Serialize,
{
    fn into_response(self) -> Response {
        match self {
            HandlerError::Api(err) => err.into_response(),
            HandlerError::Resource(err) => err.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    use super::*;

    async fn json_body(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn message_verbosity_renders_only_the_message() {
        let response = ApiError::from(NotFoundError::new(ErrorVerbosity::Message)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "The requested resource was not found" })
        );
    }

    #[tokio::test]
    async fn full_verbosity_renders_the_reason() {
        let err = BodyError::new(
            ErrorVerbosity::Full,
            "missing field `isbn`".to_string(),
            "type: object".to_string(),
        );
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "Body");
        assert_eq!(body["error"]["body_error_reason"], "missing field `isbn`");
        assert_eq!(body["message"], "Failed to parse request body");
    }

    #[tokio::test]
    async fn type_verbosity_hides_the_reason() {
        let err = InternalServerError::from_generic_error(
            ErrorVerbosity::Type,
            anyhow::anyhow!("connection refused"),
        );
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "InternalServerError");
        assert_eq!(body["error"]["internal_server_error"], Value::Null);
    }

    #[tokio::test]
    async fn none_verbosity_returns_no_content() {
        let response =
            ApiError::from(MethodNotAllowedError::new(ErrorVerbosity::None)).into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.into_body().collect().await.unwrap().to_bytes().is_empty());
    }

    #[tokio::test]
    async fn status_code_verbosity_has_empty_body() {
        let response =
            ApiError::from(PathError::new(ErrorVerbosity::StatusCode, "bad".to_string()))
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.into_body().collect().await.unwrap().to_bytes().is_empty());
    }
}
