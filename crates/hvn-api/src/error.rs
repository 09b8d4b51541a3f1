//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from hvn-escrow and hvn-dispute to HTTP status codes
//! and returns JSON error bodies with a machine-readable code. Internal
//! error details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use hvn_dispute::DisputeError;
use hvn_escrow::EscrowError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failure — missing or invalid identity context (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — caller lacks the required relationship (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
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

        if let Self::Internal(_) = &self {
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

/// Map escrow domain errors onto the transport taxonomy.
///
/// State-incompatible requests (unavailable property, missing owner, a
/// property already held, arbitration on a non-disputed transaction) are
/// conflicts; malformed input is a validation error.
impl From<EscrowError> for AppError {
    fn from(err: EscrowError) -> Self {
        match &err {
            EscrowError::PropertyNotFound(_) | EscrowError::TransactionNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            EscrowError::MissingOwner(_)
            | EscrowError::PropertyUnavailable { .. }
            | EscrowError::DuplicateTransaction(_)
            | EscrowError::NotDisputed(_) => Self::Conflict(err.to_string()),
            EscrowError::SelfPurchase
            | EscrowError::UnsupportedStatusTarget(_)
            | EscrowError::UnknownStatus(_)
            | EscrowError::UnknownPaymentMethod(_)
            | EscrowError::UnknownResolution(_)
            | EscrowError::UnknownRoleFilter(_) => Self::Validation(err.to_string()),
            EscrowError::AdminOnly => Self::Forbidden(err.to_string()),
        }
    }
}

/// Map dispute domain errors onto the transport taxonomy.
impl From<DisputeError> for AppError {
    fn from(err: DisputeError) -> Self {
        match &err {
            DisputeError::DisputeNotFound(_)
            | DisputeError::EscrowNotFound(_)
            | DisputeError::PropertyNotFound(_) => Self::NotFound(err.to_string()),
            DisputeError::InvalidReason(_)
            | DisputeError::InvalidStatus(_)
            | DisputeError::MissingAnchor
            | DisputeError::CounterpartyRequired
            | DisputeError::RespondentUnresolved => Self::Validation(err.to_string()),
            DisputeError::NotEscrowParty
            | DisputeError::NotParticipant
            | DisputeError::AdminOnly => Self::Forbidden(err.to_string()),
        }
    }
}
