//! Common error types for the employee directory

use thiserror::Error;

/// Common result type for directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the store, the card pipeline and the web layer
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    ///
    /// Treated as retryable infrastructure failure by callers.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested employee (or any employee at all) not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input: missing field, missing file, unreadable CSV
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// QR or PNG encoding failure
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Archive writer failure
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
