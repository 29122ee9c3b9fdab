//! Request definitions
//!
//! Parses and validates the raw request payload.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;

/// Methods understood by the dispatcher (matched case-sensitively)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Create,
    Update,
    Read,
    Delete,
    Echo,
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Method::Create),
            "update" => Ok(Method::Update),
            "read" => Ok(Method::Read),
            "delete" => Ok(Method::Delete),
            "echo" => Ok(Method::Echo),
            _ => Err(RequestError::UnknownMethod),
        }
    }
}

/// A validated request.
///
/// `method` is kept as received; unknown methods are rejected at dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub method: String,

    /// Unix seconds
    pub date: i64,

    /// Empty when the client sent no path
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Request {
    /// Create a request with no path and no body
    pub fn new(method: impl Into<String>, date: i64) -> Self {
        Self {
            method: method.into(),
            date,
            path: String::new(),
            body: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse and validate a raw payload.
    ///
    /// Checks run in order: well-formed JSON, presence of `method` and
    /// `date`, then the date value itself.
    pub fn parse(payload: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| RequestError::MalformedPayload(e.to_string()))?;

        // `get` on a non-object yields None, so arrays and scalars land here too
        let (method, date) = match (value.get("method"), value.get("date")) {
            (Some(method), Some(date)) => (method, date),
            _ => return Err(RequestError::MissingField),
        };

        let date = parse_date(date)?;

        Ok(Self {
            method: field_text(method).unwrap_or_default(),
            date,
            path: value.get("path").and_then(field_text).unwrap_or_default(),
            body: value.get("body").and_then(field_text),
        })
    }

    /// Parsed method, or `UnknownMethod`
    pub fn method(&self) -> Result<Method, RequestError> {
        self.method.parse()
    }

    /// The request date as a UTC timestamp
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.date, 0)
    }
}

/// Accept a JSON integer or a string holding one, within the UTC range
fn parse_date(value: &Value) -> Result<i64, RequestError> {
    let seconds = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(RequestError::InvalidDate)?;

    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|_| seconds)
        .ok_or(RequestError::InvalidDate)
}

/// Strings verbatim, null as absent, anything else as its JSON text
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
