//! Failure taxonomy for recipe fetches
//!
//! Every expected failure of the fetch path is reported as an [`ErrorInfo`]
//! value so that views can render it instead of handling a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failed (or empty) fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No response was received (DNS, connect, TLS, reset)
    NetworkFailure,
    /// A response arrived with a non-success status
    HttpStatusFailure { status: u16 },
    /// The body could not be parsed as the expected shape
    ParseFailure,
    /// The request succeeded but returned nothing to show
    ///
    /// Fetches report this as `Ok` with an empty list; views see it as
    /// `QueryStatus::Empty`.
    EmptyResult,
}

/// A failure description the UI can render directly
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NetworkFailure,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        let message = match status {
            401 | 402 => format!("The recipe service rejected the request (HTTP {})", status),
            404 => "Recipe not found (HTTP 404)".to_string(),
            429 => "Too many requests, try again later (HTTP 429)".to_string(),
            s if s >= 500 => format!("The recipe service is unavailable (HTTP {})", s),
            s => format!("Request failed (HTTP {})", s),
        };
        Self {
            kind: ErrorKind::HttpStatusFailure { status },
            message,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParseFailure,
            message: message.into(),
        }
    }

    /// HTTP status carried by an `HttpStatusFailure`
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::HttpStatusFailure { status } => Some(status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the API key, so it is stripped before formatting.
        let err = err.without_url();
        if let Some(status) = err.status() {
            ErrorInfo::http_status(status.as_u16())
        } else if err.is_decode() {
            ErrorInfo::parse(format!("Could not read the recipe response: {}", err))
        } else {
            ErrorInfo::network(format!("Could not reach the recipe service: {}", err))
        }
    }
}

impl From<serde_json::Error> for ErrorInfo {
    fn from(err: serde_json::Error) -> Self {
        ErrorInfo::parse(format!("Unexpected response from the recipe service: {}", err))
    }
}
