//! Error types for the generation library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for every fallible keystone operation.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The user's selection cannot be turned into a generation plan
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// An external service rejected a call or could not be reached
    #[error("{operation} failed: {message}")]
    Service {
        operation: String,
        status: Option<u16>,
        message: String,
    },
    /// Local key-value database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// A run has started and not yet reached a terminal state
    #[error("A generation run is still in progress")]
    RunInProgress,
}

/// Builder for validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> GenerationError {
        GenerationError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for service errors with an optional HTTP status.
pub struct ServiceErrorBuilder {
    operation: String,
    status: Option<u16>,
}

impl ServiceErrorBuilder {
    /// Create a new service error builder for the named operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: None,
        }
    }

    /// Attach the HTTP status returned by the service.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Build the error with the message reported by the service.
    pub fn with_message(self, message: impl Into<String>) -> GenerationError {
        GenerationError::Service {
            operation: self.operation,
            status: self.status,
            message: message.into(),
        }
    }
}

impl GenerationError {
    /// Creates a builder for validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates a builder for service errors.
    pub fn service(operation: impl Into<String>) -> ServiceErrorBuilder {
        ServiceErrorBuilder::new(operation)
    }

    /// Creates a database error with context.
    pub fn database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Service errors surface the server's message verbatim; everything else
    /// falls back to the `Display` rendering.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Service { message, .. } => message.clone(),
            GenerationError::Validation { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error was raised before any work started.
    pub fn is_validation(&self) -> bool {
        matches!(self, GenerationError::Validation { .. })
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to GenerationError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GenerationError::Configuration {
            message: format!("{}: {}", context, e),
        })
    }
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| GenerationError::database(message, e))
    }
}

/// Result type alias for keystone operations
pub type Result<T> = std::result::Result<T, GenerationError>;
