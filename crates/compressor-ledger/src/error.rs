//! Error types for compressor-ledger.
//!
//! This module defines all error types used throughout the crate. Request
//! handlers map these onto HTTP statuses in [`crate::web`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for compressor-ledger operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The store handle can no longer be used.
    #[error("storage unavailable: {message}")]
    StorageUnavailable {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Request Errors ===
    /// A submitted value could not be coerced to the field's type.
    #[error("invalid value for {field}: {value:?} is not a finite number")]
    Validation {
        /// Name of the offending form field.
        field: &'static str,
        /// The raw submitted value.
        value: String,
    },

    /// The submitted form could not be decoded at all.
    #[error("invalid form submission: {message}")]
    InvalidForm {
        /// Description of what was wrong with the body.
        message: String,
    },

    /// No test record exists with the requested id.
    #[error("test record {id} not found")]
    NotFound {
        /// The requested record id.
        id: i64,
    },

    // === Export Errors ===
    /// An export could not be produced or written.
    #[error("{format} export failed: {message}")]
    Export {
        /// Export format, e.g. `csv` or `pdf`.
        format: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A template failed to render.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for compressor-ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage-unavailable error.
    #[must_use]
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create an export error for the given format.
    #[must_use]
    pub fn export(format: &'static str, message: impl Into<String>) -> Self {
        Self::Export {
            format,
            message: message.into(),
        }
    }

    /// Check if this error means the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error was caused by bad caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidForm { .. })
    }
}
