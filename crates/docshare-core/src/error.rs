//! Unified application error types for DocShare.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] decides how the
//! session controller and the command line present a failure: local
//! rejections never reach the network, cancellations are not shown as
//! failures, and remote rejections carry the service's message verbatim.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A share was requested with an empty selection.
    NoFiles,
    /// A share was requested while another one is in flight.
    SessionBusy,
    /// A selection index did not refer to an existing entry.
    OutOfRange,
    /// The upload failed on the wire (network, timeout, server outage).
    Transport,
    /// The user aborted the operation.
    Cancelled,
    /// The document service answered with a non-success status.
    RemoteRejection,
    /// The document service rejected the configured credentials.
    Unauthorized,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A local file could not be read.
    Io,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFiles => write!(f, "NO_FILES"),
            Self::SessionBusy => write!(f, "SESSION_BUSY"),
            Self::OutOfRange => write!(f, "OUT_OF_RANGE"),
            Self::Transport => write!(f, "TRANSPORT"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::RemoteRejection => write!(f, "REMOTE_REJECTION"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Io => write!(f, "IO"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout DocShare.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an empty-selection error.
    pub fn no_files() -> Self {
        Self::new(ErrorKind::NoFiles, "no files selected")
    }

    /// Create a session-busy error.
    pub fn session_busy() -> Self {
        Self::new(ErrorKind::SessionBusy, "another share is already in progress")
    }

    /// Create an out-of-range error for a selection index.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("index {index} is out of range for {len} selected file(s)"),
        )
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "upload cancelled")
    }

    /// Create a remote rejection error.
    pub fn remote_rejection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RemoteRejection, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is a user-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    /// Whether the document service refused the request.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self.kind, ErrorKind::RemoteRejection | ErrorKind::Unauthorized)
    }

    /// The message to show to the user, without the kind prefix.
    pub fn user_message(&self) -> &str {
        &self.message
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
