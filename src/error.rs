//! Error types for catalogd
//!
//! Two layers of errors live here:
//! - [`CatalogError`]: infrastructure failures (I/O, framing, config)
//! - [`RequestError`]: protocol outcomes reported back to the client

use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Unified error type for catalogd infrastructure
#[derive(Debug, Error)]
pub enum CatalogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// A request that could not be served.
///
/// The `Display` text is the reason phrase written after the status code
/// in the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    // -------------------------------------------------------------------------
    // Code 4: client errors
    // -------------------------------------------------------------------------
    #[error("missing method, missing date")]
    MissingField,

    #[error("illegal date")]
    InvalidDate,

    #[error("illegal method")]
    UnknownMethod,

    #[error("missing resource")]
    MissingResource,

    #[error("missing body")]
    MissingBody,

    #[error("illegal body")]
    InvalidBody,

    #[error("bad request")]
    BadRequest,

    // -------------------------------------------------------------------------
    // Code 5: valid request, absent record
    // -------------------------------------------------------------------------
    #[error("not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Code 6: unparseable payload or unexpected failure
    // -------------------------------------------------------------------------
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RequestError {
    /// Numeric status code for the envelope
    pub fn code(&self) -> u8 {
        match self {
            RequestError::MissingField
            | RequestError::InvalidDate
            | RequestError::UnknownMethod
            | RequestError::MissingResource
            | RequestError::MissingBody
            | RequestError::InvalidBody
            | RequestError::BadRequest => 4,
            RequestError::NotFound => 5,
            RequestError::MalformedPayload(_) | RequestError::Internal(_) => 6,
        }
    }
}
