//! Centralized error handling.
//!
//! Every error kind maps to a fixed errno (numeric code + message) and an HTTP
//! status through a single lookup, so the same failure always renders the
//! same envelope regardless of which handler hit it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::config::ConfigError;
use crate::types::ApiResponse;

/// Stable code/message pair rendered in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Errno {
    pub code: i32,
    pub message: &'static str,
}

impl Errno {
    const fn new(code: i32, message: &'static str) -> Self {
        Self { code, message }
    }
}

pub const OK: Errno = Errno::new(0, "OK");
pub const INTERNAL_SERVER_ERROR: Errno = Errno::new(10001, "Internal server error.");
pub const ERR_BIND: Errno = Errno::new(
    10002,
    "Error occurred while binding the request body to the struct.",
);
pub const ERR_CONFIG: Errno = Errno::new(10003, "Configuration error.");
pub const ERR_LISTEN: Errno = Errno::new(10004, "Failed to bind listener.");
pub const ERR_VALIDATION: Errno = Errno::new(20001, "Validation failed.");
pub const ERR_DATABASE: Errno = Errno::new(20002, "Database error.");
pub const ERR_CONNECTION: Errno = Errno::new(20003, "Database connection error.");
pub const ERR_CLOSED: Errno = Errno::new(20004, "Database is closed.");
pub const ERR_ENCRYPT: Errno = Errno::new(
    20101,
    "Error occurred while encrypting the user password.",
);
pub const ERR_USER_NOT_FOUND: Errno = Errno::new(20102, "The user was not found.");

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Startup
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // Persistence gateway
    #[error("database connection failed: {0}")]
    Connection(#[source] DbErr),

    #[error("database is closed")]
    Closed,

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    // Request lifecycle
    #[error("invalid request: {0}")]
    Bind(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("password encryption failed: {0}")]
    Encryption(String),

    #[error("user not found")]
    NotFound,

    // Internal
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Errno rendered to clients for this error kind
    pub fn errno(&self) -> Errno {
        match self {
            AppError::Config(_) => ERR_CONFIG,
            AppError::Listen { .. } => ERR_LISTEN,
            AppError::Connection(_) => ERR_CONNECTION,
            AppError::Closed => ERR_CLOSED,
            AppError::Database(_) => ERR_DATABASE,
            AppError::Bind(_) => ERR_BIND,
            AppError::Validation(_) => ERR_VALIDATION,
            AppError::Encryption(_) => ERR_ENCRYPT,
            AppError::NotFound => ERR_USER_NOT_FOUND,
            AppError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Bind(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) if self.is_unique_violation() => StatusCode::CONFLICT,
            AppError::Connection(_) | AppError::Closed => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Listen { .. }
            | AppError::Database(_)
            | AppError::Encryption(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a storage uniqueness violation (e.g. duplicate username)
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => {
                matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }

    fn log(&self) {
        match self {
            AppError::Bind(_) | AppError::Validation(_) | AppError::NotFound => {
                tracing::debug!("Request rejected: {}", self)
            }
            AppError::Database(_) if self.is_unique_violation() => {
                tracing::warn!("Request rejected: {}", self)
            }
            _ => tracing::error!("Request failed: {:?}", self),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        let body = ApiResponse::<()>::error(self.errno());

        (status, body).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn bind(msg: impl Into<String>) -> Self {
        AppError::Bind(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn encryption(msg: impl Into<String>) -> Self {
        AppError::Encryption(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
