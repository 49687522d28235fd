//! Error types for sparqlz
//!
//! Two layers live here. [`QueryError`] is the immutable value a producer
//! records once when execution fails; consumers only ever see it after the
//! result has finished. [`SparqlzError`] is the operational error returned by
//! the few fallible helpers (configuration, bounded waits, row collection).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category of an executed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No error occurred
    #[default]
    NoError,
    /// The backend could not be reached or opened
    ConnectionError,
    /// The query was malformed or is not supported
    StatementError,
    /// The backend failed while executing the query
    TransactionError,
    /// Uncategorized backend failure
    BackendError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NoError => "no error",
            ErrorKind::ConnectionError => "connection error",
            ErrorKind::StatementError => "statement error",
            ErrorKind::TransactionError => "transaction error",
            ErrorKind::BackendError => "backend error",
        };
        f.write_str(name)
    }
}

/// Error recorded against a query result.
///
/// A default-constructed value has kind [`ErrorKind::NoError`] and is not
/// considered an error (`is_valid()` returns false). Fields are private so the
/// value cannot change once the producer has built it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct QueryError {
    kind: ErrorKind,
    message: String,
}

impl QueryError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConnectionError, message)
    }

    pub fn statement(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StatementError, message)
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransactionError, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendError, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for any kind other than [`ErrorKind::NoError`]
    pub fn is_valid(&self) -> bool {
        self.kind != ErrorKind::NoError
    }
}

/// Core error type for sparqlz operations
#[derive(Error, Debug)]
pub enum SparqlzError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),
}

/// Result type alias for sparqlz operations
pub type Result<T> = std::result::Result<T, SparqlzError>;
