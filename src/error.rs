use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use std::any::Any;

use crate::{dto::ErrorResponse, repository::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("note not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid path: {}", .0.body_text())]
    InvalidPath(#[from] PathRejection),

    #[error("invalid query: {}", .0.body_text())]
    InvalidQuery(#[from] QueryRejection),

    #[error("invalid body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("handler panicked: {0}")]
    Panic(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(reason) => {
                tracing::warn!("rejected request: {reason}");
                StatusCode::BAD_REQUEST.into_response()
            }
            Self::Store(_)
            | Self::InvalidPath(_)
            | Self::InvalidQuery(_)
            | Self::InvalidBody(_)
            | Self::Panic(_) => {
                tracing::error!("request failed: {self}");
                let body = ErrorResponse {
                    timestamp: Utc::now(),
                    message: "An unexpected error occurred".to_string(),
                    details: self.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

/// Turns a caught handler panic into the regular 500 body.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "unknown panic".to_string());

    ApiError::Panic(details).into_response()
}
