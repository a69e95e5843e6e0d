//! Error types for sqlchain

use thiserror::Error;

/// Result type alias for sqlchain operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// Invalid builder input, raised when the offending call is made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A dynamic call named an operation no statement part implements
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SqlError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unknown operation error
    pub fn unknown_operation(op: impl Into<String>) -> Self {
        Self::UnknownOperation(op.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an unknown operation error
    pub fn is_unknown_operation(&self) -> bool {
        matches!(self, Self::UnknownOperation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Wrap a tokio_postgres error without altering it.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SqlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(SqlError::validation("bad").is_validation());
        assert!(SqlError::unknown_operation("frobnicate").is_unknown_operation());
        assert!(SqlError::not_found("row").is_not_found());
        assert!(!SqlError::Other("x".into()).is_validation());
    }

    #[test]
    fn test_display() {
        let err = SqlError::unknown_operation("frobnicate");
        assert_eq!(err.to_string(), "Unknown operation: frobnicate");
    }
}
