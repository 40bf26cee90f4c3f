//! Error types for the bookshelf client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, remote rejection, authentication, input validation and token
//! storage errors.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Maximum number of bytes of a non-JSON error body kept in a [`ProtocolError`].
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// The unified error type for bookshelf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("request rejected: {0}")]
    Protocol(#[from] ProtocolError),

    /// Session errors (refresh exhausted, no session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Input validation errors (malformed URL, mismatched passwords).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Token store read or write failures.
    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the HTTP status of a remote rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(e) => Some(e.status),
            _ => None,
        }
    }

    /// Returns true if this is a remote rejection with status 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true if this is a remote rejection with status 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Transport-level errors: the request produced no response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The response body could not be read or decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Session errors raised by the refresh protocol.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token refresh call failed; the session has been terminated.
    #[error("token refresh failed: {0}")]
    RefreshFailed(#[source] Arc<Error>),

    /// The operation needs a session and none is stored.
    #[error("not logged in")]
    NotAuthenticated,
}

/// A remote rejection: a response with a non-2xx status.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body, if the body was JSON.
    pub body: Option<serde_json::Value>,
    /// Raw body text when it was not JSON, truncated.
    pub text: Option<String>,
}

impl ProtocolError {
    /// Create a new protocol error from a status and raw body bytes.
    pub fn new(status: u16, raw: &[u8]) -> Self {
        let body = serde_json::from_slice::<serde_json::Value>(raw).ok();
        let text = match body {
            Some(_) => None,
            None if raw.is_empty() => None,
            None => Some(truncate_body(&String::from_utf8_lossy(raw))),
        };
        Self { status, body, text }
    }

    /// The server's human-readable message.
    ///
    /// Uses the `detail` field when present, otherwise the first field
    /// error of a validation body such as `{"email": ["already taken"]}`.
    pub fn detail(&self) -> Option<String> {
        let body = self.body.as_ref()?;
        if let Some(detail) = body.get("detail").and_then(|d| d.as_str()) {
            return Some(detail.to_string());
        }
        body.as_object()?.values().find_map(first_message)
    }
}

fn first_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(detail) = self.detail() {
            write!(f, ": {}", detail)?;
        } else if let Some(ref text) = self.text {
            write!(f, ": {}", text)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API or media base URL.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// Invalid resource identifier.
    #[error("invalid id '{value}': {reason}")]
    Id { value: String, reason: String },

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Reading-list position out of range.
    #[error("position {index} is out of range for a list of {len}")]
    Position { index: usize, len: usize },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

/// Token store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The stored data could not be decoded.
    #[error("corrupt session data in {path}: {message}")]
    Corrupt { path: String, message: String },
}
