//! API error envelope shared by all handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    InvalidPeriod,
    InvalidLimit,
    NotFound,
    UpstreamUnavailable,
}

impl ApiErrorCode {
    fn status(self) -> StatusCode {
        match self {
            Self::InvalidPeriod | Self::InvalidLimit => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}

/// A client-facing error: machine code plus human message, rendered as
/// `{"error": {"code", "message"}}` with the matching HTTP status.
#[derive(Debug)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (status, body).into_response()
    }
}

/// Map an upstream failure to a 502, logging the real cause. The client
/// message stays generic; details belong in the logs.
pub fn upstream_error(context: &str, e: impl std::fmt::Display) -> ApiError {
    error!(error = %e, "{context} failed");
    ApiError::new(
        ApiErrorCode::UpstreamUnavailable,
        format!("{context} is temporarily unavailable"),
    )
}

/// `Option -> 404` for entity lookups.
pub trait OptionNotFoundExt<T> {
    fn or_not_found(self, entity: &str, id: &str) -> Result<T, ApiError>;
}

impl<T> OptionNotFoundExt<T> for Option<T> {
    fn or_not_found(self, entity: &str, id: &str) -> Result<T, ApiError> {
        self.ok_or_else(|| {
            ApiError::new(ApiErrorCode::NotFound, format!("{entity} '{id}' not found"))
        })
    }
}
