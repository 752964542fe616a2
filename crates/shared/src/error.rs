//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every domain error in the workspace collapses into one of these
/// categories at the boundary where callers need a uniform outcome.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced account, journal, asset, budget, or invoice is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any state mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not allowed in the entity's current state.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflicting state (e.g., a duplicate or in-use record).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Builds an `AppError` from a domain error's HTTP status, keeping its message.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            422 => Self::BusinessRule(message),
            409 => Self::Conflict(message),
            _ => Self::Internal(message),
        }
    }
}
