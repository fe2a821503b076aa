//! API error handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Ways a webhook can fail to deploy, as seen by the caller.
///
/// Bodies are plain text so that registry delivery logs stay readable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No service or stack is configured for the pushed image.
    #[error("no route for image {0}")]
    NotFound(String),

    /// The deployment command failed or could not be started.
    #[error("deployment failed: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found\n"),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n")
            }
        };

        (status, body).into_response()
    }
}
