use axum::{extract::Request, middleware::Next, response::Response};

/// Middlware to trace request and response headers.
pub async fn trace_headers(req: Request, next: Next) -> Response {
    let request_headers = req.headers();
    tracing::trace!(?request_headers, "Headers");

    let response = next.run(req).await;

    let response_headers = response.headers();
    tracing::trace!(?response_headers, "Headers");

    response
}
