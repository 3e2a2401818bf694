//! Error handling for the lot server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No eligible space under the allocation policy
    #[error("Lot full: {0}")]
    LotFull(String),

    /// Exit requested for a plate with no active record
    #[error("Not parked: {0}")]
    NotParked(String),

    /// Entry requested for a plate that is already parked
    #[error("Already parked: {0}")]
    AlreadyParked(String),

    /// Whitelist insert collision
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Reservation toggle on an occupied space
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Unknown space code
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invariant breach (illegal space transition)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            Error::LotFull(msg) => (StatusCode::SERVICE_UNAVAILABLE, "LOT_FULL", msg.clone()),
            Error::NotParked(msg) => (StatusCode::NOT_FOUND, "NOT_PARKED", msg.clone()),
            Error::AlreadyParked(msg) => (StatusCode::CONFLICT, "ALREADY_PARKED", msg.clone()),
            Error::Duplicate(msg) => (StatusCode::CONFLICT, "DUPLICATE", msg.clone()),
            Error::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            Error::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        tracing::error!(
            status = %status,
            error_code = %error_code,
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error_code": error_code,
            "message": message
        }));

        (status, body).into_response()
    }
}
