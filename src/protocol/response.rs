//! Response definitions
//!
//! Represents the outcome of a request and its wire envelope.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Success status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 1,
    Created = 2,
    Updated = 3,
}

impl Status {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Status::Ok => "Ok",
            Status::Created => "Created",
            Status::Updated => "Updated",
        }
    }
}

/// The outcome of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Codes 1-3, always with a payload
    Success { status: Status, payload: String },

    /// Codes 4-6, rendered with a null body
    Failure(RequestError),
}

impl Response {
    /// Create an OK response
    pub fn ok(payload: impl Into<String>) -> Self {
        Self::Success {
            status: Status::Ok,
            payload: payload.into(),
        }
    }

    /// Create a CREATED response
    pub fn created(payload: impl Into<String>) -> Self {
        Self::Success {
            status: Status::Created,
            payload: payload.into(),
        }
    }

    /// Create an UPDATED response
    pub fn updated() -> Self {
        Self::Success {
            status: Status::Updated,
            payload: Status::Updated.phrase().to_string(),
        }
    }

    /// Numeric status code
    pub fn code(&self) -> u8 {
        match self {
            Response::Success { status, .. } => status.code(),
            Response::Failure(err) => err.code(),
        }
    }

    /// The `"<code> <phrase>"` string written to the envelope
    pub fn status_line(&self) -> String {
        match self {
            Response::Success { status, .. } => format!("{} {}", status.code(), status.phrase()),
            Response::Failure(err) => format!("{} {}", err.code(), err),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Response::Success { payload, .. } => Some(payload),
            Response::Failure(_) => None,
        }
    }
}

impl From<RequestError> for Response {
    fn from(err: RequestError) -> Self {
        Response::Failure(err)
    }
}

/// The `{status, body}` object sent on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub body: Option<String>,
}

impl Envelope {
    /// Leading numeric code of `status`, if it has one
    pub fn code(&self) -> Option<u8> {
        self.status.split(' ').next()?.parse().ok()
    }

    /// Everything after the code
    pub fn reason(&self) -> &str {
        self.status
            .split_once(' ')
            .map(|(_, reason)| reason)
            .unwrap_or("")
    }
}

impl From<&Response> for Envelope {
    fn from(response: &Response) -> Self {
        Self {
            status: response.status_line(),
            body: response.payload().map(str::to_string),
        }
    }
}
