//! Error types for post synchronization.
//!
//! [`ApiError`] describes what the remote service or the transport reported. [`OperationError`]
//! is what a store operation hands back to its caller once the failure has been classified:
//! validation rejections are recoverable and carry field-level messages, everything else is
//! passed through untouched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the remote service uses for field-level validation failures.
pub const VALIDATION_STATUS: u16 = 422;

/// Per-field validation messages, e.g. `{"title": "required"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Extracts the payload from a 422 body shaped like `{"error": {field: message}}`.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(body.get("error")?.clone()).ok()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Failures reported by the HTTP collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the validation payload when this is a well-formed 422 response.
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        match self {
            ApiError::Status {
                status: VALIDATION_STATUS,
                body: Some(body),
            } => ValidationErrors::from_body(body),
            _ => None,
        }
    }
}

/// Outcome of a failed store operation, as seen by its caller.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The service rejected the input field by field. Recoverable.
    #[error("Validation failed: {0}")]
    Rejected(ValidationErrors),

    #[error("Request failed: {0}")]
    Failed(#[from] ApiError),

    #[error("Request cancelled")]
    Cancelled,
}

impl OperationError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            OperationError::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}
