//! Ledger Error Types
//!
//! This module provides ledger-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Ledger-specific result type alias
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-specific error variants
///
/// These are domain-specific errors that map to appropriate HTTP status codes
/// and can be converted to `AppError` for unified error handling.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Negative earn amount or non-positive claim amount; rejected before
    /// any storage access, never retried
    #[error("Invalid credit amount")]
    InvalidAmount,

    /// The referenced account does not exist in the backing store
    #[error("Account not found")]
    AccountNotFound,

    /// The claim invariant could not be satisfied within the retry budget.
    /// This is the expected outcome when a user claims more than their
    /// current earned balance or loses a race to a concurrent claim.
    #[error("Claim rejected: claimed credits cannot exceed earned credits")]
    ClaimRejected,

    /// Quiz outcome is malformed (negative score or score above total)
    #[error("Invalid quiz outcome")]
    InvalidOutcome,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InvalidAmount => StatusCode::BAD_REQUEST,
            LedgerError::AccountNotFound => StatusCode::NOT_FOUND,
            LedgerError::ClaimRejected => StatusCode::CONFLICT,
            LedgerError::InvalidOutcome => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::Database(_) | LedgerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount => ErrorKind::BadRequest,
            LedgerError::AccountNotFound => ErrorKind::NotFound,
            LedgerError::ClaimRejected => ErrorKind::Conflict,
            LedgerError::InvalidOutcome => ErrorKind::UnprocessableEntity,
            LedgerError::Database(_) | LedgerError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    ///
    /// The three ledger-level kinds are deterministic user-actionable
    /// rejections, so none of them is logged as an unexpected error.
    fn log(&self) {
        match self {
            LedgerError::Database(e) => {
                tracing::error!(error = %e, "Ledger database error");
            }
            LedgerError::Internal(msg) => {
                tracing::error!(message = %msg, "Ledger internal error");
            }
            LedgerError::ClaimRejected => {
                tracing::warn!("Claim rejected after retries");
            }
            _ => {
                tracing::debug!(error = %self, "Ledger error");
            }
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Return empty body for security (don't leak details)
        (status, ()).into_response()
    }
}
