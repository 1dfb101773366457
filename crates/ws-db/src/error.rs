//! Error types for ws-db

use thiserror::Error;
use ws_core::CoreError;
use ws_sql::SqlError;

/// Snowflake reports an expired session with this code.
const SNOWFLAKE_AUTH_EXPIRED_CODE: &str = "390114";

/// Warehouse operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Statement execution error (D001)
    #[error("[D001] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D002)
    #[error("[D002] Table not found: {0}")]
    TableNotFound(String),

    /// Session authentication expired (D003)
    #[error("[D003] Warehouse authentication expired: {0}")]
    AuthenticationExpired(String),

    /// Staging load error (D004)
    #[error("[D004] Loading staging table failed: {0}")]
    LoadError(String),

    /// Lock poisoned (D005)
    #[error("[D005] Table config lock poisoned: {0}")]
    MutexPoisoned(String),

    /// Table has no settings in the configuration (D006)
    #[error("[D006] Table '{0}' is not configured")]
    TableNotConfigured(String),

    /// Statement synthesis error (D007)
    #[error("[D007] {0}")]
    Sql(#[from] SqlError),

    /// Configuration error (D008)
    #[error("[D008] {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Classify a driver error message.
    ///
    /// Drivers expose few structured variants, so the message text is
    /// matched with narrow patterns.
    pub fn from_driver_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if is_auth_expired_message(&lower) {
            DbError::AuthenticationExpired(message)
        } else if lower.contains("does not exist") || lower.contains("not found: table") {
            DbError::TableNotFound(message)
        } else {
            DbError::ExecutionError(message)
        }
    }

    /// Whether reconnecting and retrying may succeed
    pub fn is_authentication_expired(&self) -> bool {
        match self {
            DbError::AuthenticationExpired(_) => true,
            DbError::ExecutionError(msg) => is_auth_expired_message(&msg.to_lowercase()),
            _ => false,
        }
    }
}

fn is_auth_expired_message(lower: &str) -> bool {
    lower.contains(SNOWFLAKE_AUTH_EXPIRED_CODE)
        || lower.contains("authentication token has expired")
}
