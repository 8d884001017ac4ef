//! Error types for pgschema

use thiserror::Error;

/// Result type alias for pgschema operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for statement execution and row decoding
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A single-row fetch matched more rows than expected
    #[error("Expected at most {expected} row(s), got {got}")]
    TooManyRows { expected: usize, got: usize },

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A cell could not be decoded into the projected field type
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A fetched row has a different number of cells than the projection
    #[error("Row arity mismatch: projection has {expected} column(s), row has {got}")]
    Arity { expected: usize, got: usize },

    /// Statement could not be built
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a too-many-rows error
    pub fn too_many_rows(expected: usize, got: usize) -> Self {
        Self::TooManyRows { expected, got }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a decode failure (cell type or row arity)
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Arity { .. })
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_and_arity_are_both_decode_failures() {
        assert!(DbError::decode("name", "expected text").is_decode());
        assert!(DbError::Arity { expected: 2, got: 3 }.is_decode());
        assert!(!DbError::not_found("no row").is_decode());
    }

    #[test]
    fn messages_name_the_column() {
        let err = DbError::decode("ref_count", "expected integer, got text");
        assert_eq!(
            err.to_string(),
            "Decode error on column 'ref_count': expected integer, got text"
        );
    }
}
