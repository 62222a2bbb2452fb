/// dbfacade Error Module
///
/// This module defines the error types used across the facade. It provides
/// structured error handling with proper error propagation and user-friendly
/// error messages.
use thiserror::Error;

/// Error type covering every failure mode of the facade.
///
/// Connection and query failures are environmental faults reported by the
/// driver; unknown-column and type-mismatch failures indicate programmer
/// error (wrong column name, wrong accessor) and are raised eagerly from the
/// accessor surface.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// Connection establishment failed. Fatal to the `Database` instance
    /// being constructed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// SQL statement errors (syntax, missing tables, driver faults during
    /// execution or result conversion)
    #[error("Query error: {0}")]
    Query(String),

    /// Name-based column lookup miss
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A typed accessor was called on a non-null value of a different kind.
    /// No cross-kind coercion is performed (no string-to-int parsing).
    #[error("Type mismatch in column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        column: String,
    },

    /// Errors surfaced directly by the underlying rusqlite driver
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Type alias for Result to use FacadeError as the error type.
pub type Result<T> = std::result::Result<T, FacadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let conn_err = FacadeError::Connection("refused".to_string());
        assert!(conn_err.to_string().contains("Connection error"));

        let query_err = FacadeError::Query("syntax error".to_string());
        assert!(query_err.to_string().contains("Query error"));

        let column_err = FacadeError::UnknownColumn("missing".to_string());
        assert_eq!(column_err.to_string(), "Unknown column: missing");

        let mismatch = FacadeError::TypeMismatch {
            expected: "integer",
            found: "text",
            column: "name".to_string(),
        };
        assert!(mismatch.to_string().contains("expected integer"));
        assert!(mismatch.to_string().contains("found text"));
    }

    #[test]
    fn test_error_conversion() {
        let db_err: FacadeError = rusqlite::Error::ExecuteReturnedResults.into();
        match db_err {
            FacadeError::Database(_) => {}
            _ => panic!("Expected Database error"),
        }
    }
}
