use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Serializes `T` as a JSON response body with an explicit `charset=utf-8` content type.
#[derive(Debug)]
pub struct JsonBody<T> {
    value: T,
    pretty: bool,
}

impl<T> JsonBody<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            pretty: false,
        }
    }

    pub fn pretty(value: T) -> Self {
        Self {
            value,
            pretty: true,
        }
    }
}

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        let bytes = match self.pretty {
            true => serde_json::to_vec_pretty(&self.value),
            false => serde_json::to_vec(&self.value),
        };

        match bytes {
            Ok(bytes) => (
                [(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON_UTF8))],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(%err, "Failed to serialize response body");

                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
