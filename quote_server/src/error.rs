//! HTTP mapping for server-side failures.
//!
//! Everything that goes wrong before the response is committed is a `QuoteError`;
//! `ApiError` turns it into a `500 Internal Server Error` whose plain-text body is the
//! error's message, e.g. `fetch timeout: no answer within 200ms`.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quote_common::QuoteError;

/// A `QuoteError` on its way to the HTTP caller.
#[derive(Debug)]
pub struct ApiError(pub QuoteError);

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        ApiError(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}
