// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for reqvis
//!
//! Every error carries enough context to attribute a failed audit to a
//! specific request, pattern or lifecycle step.

use thiserror::Error;

/// Result type alias for reqvis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for reqvis
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A request that must stay invisible was observed by the interceptor
    #[error("Classification violation: {message}")]
    ClassificationViolation {
        pattern: Option<String>,
        message: String,
    },

    /// The interception layer could not be installed
    #[error("{context}: {source}")]
    SetupFailure {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Timeout error
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        attempts: Option<usize>,
    },

    /// Expected side-effect requests were not observed
    #[error("Liveness check failed: missing {missing:?}, unexpected {unexpected:?}")]
    LivenessUnconfirmed {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// An interceptor aborted the request
    #[error("Request to {url} aborted by interceptor: {reason}")]
    Aborted { url: String, reason: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Topic subscription error
    #[error("Topic error: {0}")]
    Topic(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a classification violation from a diagnostic message
    pub fn violation<S: Into<String>>(message: S) -> Self {
        Error::ClassificationViolation {
            pattern: None,
            message: message.into(),
        }
    }

    /// Create a classification violation naming the offending pattern
    pub fn violation_for(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ClassificationViolation {
            pattern: Some(pattern.into()),
            message: message.into(),
        }
    }

    /// Wrap an installation error
    pub fn setup_failure(context: impl Into<String>, source: Error) -> Self {
        Error::SetupFailure {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            attempts: None,
        }
    }

    /// Create a timeout error recording how many attempts were made
    pub fn timeout_after_attempts(
        operation: impl Into<String>,
        duration_ms: u64,
        attempts: usize,
    ) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            attempts: Some(attempts),
        }
    }

    /// Create an aborted-request error
    pub fn aborted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Aborted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Error::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this is a classification violation
    pub fn is_violation(&self) -> bool {
        matches!(self, Error::ClassificationViolation { .. })
    }

    /// Check if this is an installation failure
    pub fn is_setup_failure(&self) -> bool {
        matches!(self, Error::SetupFailure { .. })
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_))
    }

    /// Get the offending pattern of a violation, if known
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Error::ClassificationViolation {
                pattern: Some(p), ..
            } => Some(p),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;

    /// Mark the error as an installation failure
    fn setup_context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }

    fn setup_context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::setup_failure(msg, e.into()))
    }
}
