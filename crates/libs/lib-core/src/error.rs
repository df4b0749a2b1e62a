//! # Centralized Error Handling
//!
//! Application-wide error type [`AppError`] used across all gateway modules,
//! following the `thiserror` pattern.
//!
//! ## Error Categories
//!
//! 1. **Request-shape errors**: missing or mistyped fields, rejected before
//!    any side effect ([`InvalidInput`](AppError::InvalidInput)).
//! 2. **Auth errors**: invalid session token, signature, public key or agent
//!    id; fatal, no wallet call is made.
//! 3. **Domain-state errors**: player/transaction lookup and idempotency
//!    failures, surfaced to vendors as provider-specific codes.
//! 4. **Upstream errors**: non-success wallet status codes and vendor API
//!    failures; surfaced but never retried here.
//!
//! ## Concurrency note
//!
//! The idempotency check in the orchestrators is check-then-act and not
//! atomic in-process. The UNIQUE constraint on `bet_transactions.trx_id` is
//! the real guard: a concurrent duplicate insert surfaces as a database
//! unique violation, which `From<sqlx::Error>` translates into
//! [`TransactionAlreadyExists`](AppError::TransactionAlreadyExists).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or credential loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request input (missing/mistyped field, bad amount, bad time).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Presented session or bearer token is absent, unknown, expired, or
    /// lacks the scope the endpoint requires.
    #[error("Invalid token")]
    InvalidToken,

    /// Vendor callback signature does not match the computed digest.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Vendor public-key header does not match the configured credential.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Caller-presented agent id does not match the configured agent id.
    #[error("Invalid agent id")]
    InvalidAgentId,

    /// No player record exists for the presented play id.
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// No provider credentials are configured for the currency.
    #[error("Currency not supported: {0}")]
    CurrencyNotSupported(String),

    /// Referenced transaction does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// A transaction with this trx id has already been recorded.
    #[error("Transaction already exists: {0}")]
    TransactionAlreadyExists(String),

    /// The transaction was already settled or cancelled.
    #[error("Transaction already settled: {0}")]
    TransactionAlreadySettled(String),

    /// Wallet balance is below the requested stake.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Wallet returned a non-success status code.
    #[error("Wallet error: status {status}")]
    Wallet { status: u32 },

    /// Wallet service could not be reached.
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// Vendor API call failed.
    #[error("Vendor error: {0}")]
    Vendor(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    ///
    /// Used by the internal (operator-facing) endpoints; vendor callbacks map
    /// errors to their own coded envelopes instead.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken
            | AppError::InvalidSignature
            | AppError::InvalidPublicKey
            | AppError::InvalidAgentId => StatusCode::UNAUTHORIZED,
            AppError::PlayerNotFound(_) | AppError::TransactionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::CurrencyNotSupported(_)
            | AppError::TransactionAlreadyExists(_)
            | AppError::TransactionAlreadySettled(_)
            | AppError::InsufficientFunds => StatusCode::CONFLICT,
            AppError::Wallet { .. } | AppError::WalletUnavailable(_) | AppError::Vendor(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message.
    ///
    /// For infrastructure errors, returns a generic message to avoid exposing
    /// implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            AppError::Wallet { .. } | AppError::WalletUnavailable(_) => {
                "Wallet service temporarily unavailable".to_string()
            }
            AppError::Vendor(_) => "Vendor service temporarily unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

/// Implement Axum's `IntoResponse` for the internal endpoints.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let error_code = match self {
            AppError::Config(_) => "Config",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::InvalidToken => "InvalidToken",
            AppError::InvalidSignature => "InvalidSignature",
            AppError::InvalidPublicKey => "InvalidPublicKey",
            AppError::InvalidAgentId => "InvalidAgentId",
            AppError::PlayerNotFound(_) => "PlayerNotFound",
            AppError::CurrencyNotSupported(_) => "CurrencyNotSupported",
            AppError::TransactionNotFound(_) => "TransactionNotFound",
            AppError::TransactionAlreadyExists(_) => "TransactionAlreadyExists",
            AppError::TransactionAlreadySettled(_) => "TransactionAlreadySettled",
            AppError::InsufficientFunds => "InsufficientFunds",
            AppError::Wallet { .. } => "Wallet",
            AppError::WalletUnavailable(_) => "WalletUnavailable",
            AppError::Vendor(_) => "Vendor",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        };

        let body = Json(json!({
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert `sqlx::Error` to `AppError`.
///
/// A unique-constraint violation means a concurrent writer already recorded
/// the transaction, so it maps to `TransactionAlreadyExists`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                AppError::Database("Database record not found".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::TransactionAlreadyExists(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
            _ => AppError::Database(format!("Database error: {}", err)),
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON error: {}", err))
    }
}

/// Convert time-normalization failures to `AppError`.
impl From<lib_utils::time::Error> for AppError {
    fn from(err: lib_utils::time::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
