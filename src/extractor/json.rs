use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Json as AxumJson, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::{
    ApiError, BodyError, ErrorVerbosity, ErrorVerbosityProvider, InternalServerError,
};

/// Extracts the request body as JSON consuming the request, rejecting with an [`ApiError`].
///
/// Unlike [`axum::extract::Json`] the `Content-Type` header is not checked, only the body itself.
/// Every rejection becomes a [`BodyError`] with [`axum::http::StatusCode::BAD_REQUEST`].
/// The expected schema is only rendered when the verbosity asks for it.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let decoded = match Bytes::from_request(req, state).await {
            Ok(bytes) => AxumJson::<T>::from_bytes(&bytes),
            Err(rejection) => Err(JsonRejection::from(rejection)),
        };

        match decoded {
            Ok(AxumJson(value)) => {
                tracing::trace!(json=?value, "Extracted");

                Ok(ApiJson(value))
            }
            Err(rejection) => Err(reject::<T>(state.error_verbosity(), rejection)),
        }
    }
}

fn reject<T: JsonSchema>(verbosity: ErrorVerbosity, rejection: JsonRejection) -> ApiError {
    let kind = match &rejection {
        JsonRejection::JsonDataError(_) => "data",
        JsonRejection::JsonSyntaxError(_) => "syntax",
        JsonRejection::BytesRejection(_) => "bytes",
        _ => "other",
    };

    tracing::warn!(kind, reason = %rejection.body_text(), "Rejection");

    if !verbosity.should_generate_error_reason() {
        return BodyError::new(verbosity, String::new(), String::new()).into();
    }

    match serde_yaml::to_string(&schema_for!(T)) {
        Ok(schema) => BodyError::new(verbosity, rejection.body_text(), schema).into(),
        Err(err) => InternalServerError::from_generic_error(verbosity, err).into(),
    }
}
