//! Error handling for the registry client

use std::fmt;
use thiserror::Error;

/// Unified error type for the registry client
#[derive(Error, Debug)]
pub enum Error {
    /// A populated foreign key in a draft does not resolve to an existing record
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// A draft breaks head-of-family uniqueness or beneficiary exclusivity
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The remote service could not be reached
    #[error("Remote service unavailable: {0}")]
    RemoteUnavailable(#[from] reqwest::Error),

    /// The remote service answered with an error status
    #[error("Remote service rejected the request (status {status}): {body}")]
    RemoteRejected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new invalid-reference error
    pub fn invalid_reference<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidReference(msg.to_string())
    }

    /// Create a new constraint-violation error
    pub fn constraint<T: fmt::Display>(msg: T) -> Self {
        Error::ConstraintViolation(msg.to_string())
    }

    /// Create a new remote-rejected error from a response status and body
    pub fn remote_rejected(status: reqwest::StatusCode, body: String) -> Self {
        Error::RemoteRejected { status, body }
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
