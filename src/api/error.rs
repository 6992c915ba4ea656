//! Mapping of engine errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::BankError;

/// Error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                code,
            },
        }
    }
}

impl From<BankError> for ApiError {
    fn from(e: BankError) -> Self {
        let (status, code) = match &e {
            BankError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            BankError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            BankError::InsufficientFunds(..) => (StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS"),
            BankError::NotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            BankError::SenderNotFound(_) => (StatusCode::NOT_FOUND, "SENDER_NOT_FOUND"),
            BankError::RecipientNotFound(_) => (StatusCode::NOT_FOUND, "RECIPIENT_NOT_FOUND"),
            BankError::InvalidCredential(_) => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIAL"),
        };
        Self::new(status, code, e.to_string())
    }
}

/// Missing, non-json or mistyped request bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_BODY",
            format!("invalid request body: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
