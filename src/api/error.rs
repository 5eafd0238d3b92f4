use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::error::RunError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Conflict(String),
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("Market data is still loading")]
    Loading,
    #[error("Failed to fetch market data: {0}")]
    Upstream(String),
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::AlreadyRunning => ApiError::Conflict(err.to_string()),
            RunError::Listing(e) => ApiError::Upstream(e.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnknownSortKey(_) => StatusCode::BAD_REQUEST,
            ApiError::Loading => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
