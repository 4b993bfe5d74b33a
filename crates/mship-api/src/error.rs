//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from mship-engine and mship-manager to HTTP
//! status codes with a JSON error body. Internal error details are
//! never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mship_engine::EngineError;
use mship_manager::ManagerError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authorization failure — wrong principal or bad role proof (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with the shipment's current state: wrong phase or a
    /// consumed one-shot gate (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Logged but not returned verbatim.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::ShipmentNotFound { .. } | EngineError::DocumentNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            EngineError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            EngineError::WrongPhase { .. }
            | EngineError::AlreadyEvaluated { .. }
            | EngineError::AlreadyApproved { .. } => Self::Conflict(err.to_string()),
            EngineError::InvalidArgument(_) => Self::Validation(err.to_string()),
            EngineError::Ledger(_) | EngineError::Registry(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match &err {
            ManagerError::ShipmentNotFound { .. } | ManagerError::DocumentNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            ManagerError::Unauthorized { .. } => Self::Forbidden(err.to_string()),
            ManagerError::WrongStatus { .. }
            | ManagerError::AlreadyEvaluated { .. }
            | ManagerError::AlreadyApproved { .. } => Self::Conflict(err.to_string()),
            ManagerError::Ledger(_) | ManagerError::Registry(_) => Self::Internal(err.to_string()),
        }
    }
}
