use crate::extractor::ExtractionError;
use crate::parser::ParseError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid 'since' parameter: {0}")]
    InvalidSince(#[source] ParseError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidSince(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            ApiError::Extraction(e) => {
                error!("Log extraction failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Log extraction failed").into_response()
            }
        }
    }
}
