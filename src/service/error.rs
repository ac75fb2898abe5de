//! Error types for command handlers.

use std::error::Error;
use std::fmt;

use crate::document::StoreError;
use crate::reports::ReportError;

#[derive(Debug)]
pub enum HandlerError {
    /// No handler registered for this command name.
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    DecodeFailed(String),
    /// The request is well-formed but cannot be served.
    Rejected(String),
    NotFound(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    Store(StoreError),
    /// Guard rejected the command (input validation failed).
    GuardRejected(String),
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnknownCommand(name) => write!(f, "unknown command: {}", name),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(what) => write!(f, "not found: {}", what),
            HandlerError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            HandlerError::Store(e) => write!(f, "{}", e),
            HandlerError::GuardRejected(name) => write!(f, "guard rejected command: {}", name),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Store(e) => Some(e),
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::Store(err)
    }
}

impl From<ReportError> for HandlerError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Store(e) => HandlerError::Store(e),
            ReportError::NotFound { collection, id } => {
                HandlerError::NotFound(format!("{}:{}", collection, id))
            }
            ReportError::Invalid(msg) => HandlerError::Rejected(msg),
            decode @ ReportError::Decode(_) => HandlerError::Other(Box::new(decode)),
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Rejected(_) => 422,
            HandlerError::NotFound(_) => 404,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Store(StoreError::InvalidId(_)) => 400,
            HandlerError::Store(_) => 500,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Other(_) => 500,
        }
    }
}
