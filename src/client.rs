//! Blocking client
//!
//! Opens one connection per request, as the protocol requires.

use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use chrono::Utc;

use crate::dispatcher::COLLECTION_PATH;
use crate::error::Result;
use crate::protocol::{decode_envelope, encode_request, read_payload, write_payload, Envelope, Request};

/// Largest response the client will buffer (16 MB)
pub const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Client for a catalogd server
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client for the given `host:port`
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Set the read/write timeout (`None` blocks indefinitely)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a request and wait for its envelope
    pub fn send(&self, request: &Request) -> Result<Envelope> {
        let payload = encode_request(request)?;
        self.send_raw(&payload)
    }

    /// Send arbitrary bytes as the request payload
    pub fn send_raw(&self, payload: &[u8]) -> Result<Envelope> {
        let mut stream = TcpStream::connect(&self.addr)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        write_payload(&mut stream, payload)?;
        stream.shutdown(Shutdown::Write)?;

        let response = read_payload(&mut stream, MAX_RESPONSE_BYTES)?;
        decode_envelope(&response)
    }

    // =========================================================================
    // Convenience requests (stamped with the current time)
    // =========================================================================

    /// Read a path (`/api/categories` or `/api/categories/<id>`)
    pub fn read(&self, path: &str) -> Result<Envelope> {
        self.send(&Request::new("read", now()).with_path(path))
    }

    /// Create a category
    pub fn create(&self, name: &str) -> Result<Envelope> {
        let request = Request::new("create", now())
            .with_path(COLLECTION_PATH)
            .with_body(name_body(name));
        self.send(&request)
    }

    /// Rename a category
    pub fn update(&self, id: i64, name: &str) -> Result<Envelope> {
        let request = Request::new("update", now())
            .with_path(item_path(id))
            .with_body(name_body(name));
        self.send(&request)
    }

    /// Delete a category
    pub fn delete(&self, id: i64) -> Result<Envelope> {
        self.send(&Request::new("delete", now()).with_path(item_path(id)))
    }

    /// Echo a body back
    pub fn echo(&self, body: &str) -> Result<Envelope> {
        self.send(&Request::new("echo", now()).with_body(body))
    }
}

/// Path of a single category
pub fn item_path(id: i64) -> String {
    format!("{}/{}", COLLECTION_PATH, id)
}

fn name_body(name: &str) -> String {
    serde_json::json!({ "name": name }).to_string()
}

fn now() -> i64 {
    Utc::now().timestamp()
}
