//! HTTP error responses
//!
//! Core errors map onto status codes here. Every error body has the same
//! shape: a `message` string plus an optional `error` detail line.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;
use verdant_core::Error;

static EXPOSE_DETAIL: OnceLock<bool> = OnceLock::new();

/// Decide once at startup whether 500 bodies carry the underlying error
/// text. Production keeps it out of responses; the log line has it
/// either way.
pub fn expose_error_detail(expose: bool) {
    let _ = EXPOSE_DETAIL.set(expose);
}

fn detail_exposed() -> bool {
    EXPOSE_DETAIL.get().copied().unwrap_or(false)
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Status code plus the JSON error body the clients expect.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// 500 with a caller-chosen message; the detail line obeys the same
    /// exposure rule as every other internal error.
    pub fn server_error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            detail: detail_exposed().then(|| detail.into()),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, message, detail) = match err {
            Error::Validation { message, detail } => (StatusCode::BAD_REQUEST, message, detail),
            Error::Auth(message) => (StatusCode::UNAUTHORIZED, message, None),
            Error::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            Error::EntryNotFound => (
                StatusCode::NOT_FOUND,
                Error::EntryNotFound.to_string(),
                None,
            ),
            Error::Store(detail) | Error::Dispatch(detail) => {
                error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error".to_string(),
                    detail_exposed().then_some(detail),
                )
            }
        };
        Self {
            status,
            message,
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.detail {
            Some(detail) => json!({ "message": self.message, "error": detail }),
            None => json!({ "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
