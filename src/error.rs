//! Unified error hierarchy for the wellness engine
//!
//! Structured error types with severity classification and integration with
//! the tracing system. Engine computations are total functions; errors arise
//! only at the store boundary, on missing users, and on permission checks.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for all wellness operations
#[derive(Debug, Error)]
pub enum WellnessError {
    /// Requested user profile does not exist; suggestion generation aborts
    /// entirely rather than producing a partial result
    #[error("User profile not found: {user_id}")]
    ProfileNotFound { user_id: Uuid },

    /// Caller lacks the role required for the operation
    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    /// Persistence collaborator errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Stored value could not be decoded into its domain type
    #[error("Decode error in {table}.{column}: {reason}")]
    Decode {
        table: &'static str,
        column: &'static str,
        reason: String,
    },

    /// Connection failed
    #[error("Store connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// Record not found
    #[error("Record not found: {table}.{id}")]
    NotFound { table: &'static str, id: String },

    /// Duplicate entry
    #[error("Duplicate entry: {table}.{key}")]
    Duplicate { table: &'static str, key: String },
}

/// Result type alias for wellness operations
pub type Result<T> = std::result::Result<T, WellnessError>;

impl WellnessError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WellnessError::Store(StoreError::ConnectionFailed { .. }) | WellnessError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WellnessError::ProfileNotFound { .. } => ErrorSeverity::Warning,
            WellnessError::PermissionDenied { .. } => ErrorSeverity::Warning,
            WellnessError::Validation(_) => ErrorSeverity::Warning,
            WellnessError::Store(StoreError::NotFound { .. }) => ErrorSeverity::Warning,
            WellnessError::Store(StoreError::ConnectionFailed { .. }) => ErrorSeverity::Error,
            WellnessError::Store(_) => ErrorSeverity::Error,
            WellnessError::Configuration(_) => ErrorSeverity::Error,
            WellnessError::Io(_) => ErrorSeverity::Error,
            WellnessError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WellnessError::ProfileNotFound { user_id } => {
                format!("No profile exists for user {}. Create one before requesting suggestions.", user_id)
            }
            WellnessError::PermissionDenied { reason } => reason.clone(),
            WellnessError::Store(StoreError::ConnectionFailed { .. }) => {
                "Unable to open the wellness database. Please check your configuration.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
