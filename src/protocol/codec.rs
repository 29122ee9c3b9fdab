//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! Messages are not length-prefixed: a request ends where its JSON value
//! ends, or where the client closes its write half.

use std::io::{ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};

use super::{Envelope, Request, Response};
use crate::error::{CatalogError, Result};

/// Bytes pulled from the socket per read call
pub const READ_CHUNK_SIZE: usize = 2048;

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Render a response into its envelope bytes. Never fails.
pub fn encode_response(response: &Response) -> Vec<u8> {
    let envelope = Envelope::from(response);
    serde_json::json!({
        "status": envelope.status,
        "body": envelope.body,
    })
    .to_string()
    .into_bytes()
}

/// Decode an envelope from bytes (client side)
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope> {
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to bytes (client side)
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(request)?)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one message from a stream.
///
/// Stops at end of stream, once the top-level value has closed, or once a
/// top-level byte shows the payload is a scalar or garbage. Fails if more
/// than `max_bytes` arrive first. Each byte is scanned once.
pub fn read_payload<R: Read>(reader: &mut R, max_bytes: usize) -> Result<Bytes> {
    let mut buffer = BytesMut::with_capacity(READ_CHUNK_SIZE);
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut boundary = ValueBoundary::default();

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            break;
        }

        buffer.extend_from_slice(&chunk[..n]);
        if buffer.len() > max_bytes {
            return Err(CatalogError::Protocol(format!(
                "Payload too large: more than {} bytes",
                max_bytes
            )));
        }

        if boundary.feed(&chunk[..n]) {
            break;
        }
    }

    Ok(buffer.freeze())
}

/// Write one message to a stream
pub fn write_payload<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Tracks where the first top-level JSON value ends.
///
/// Only nesting and string state are followed; validation is left to the
/// request parser.
#[derive(Debug, Default)]
struct ValueBoundary {
    depth: usize,
    in_string: bool,
    escaped: bool,
    done: bool,
}

impl ValueBoundary {
    /// Scan newly read bytes. Returns true once the value has ended.
    fn feed(&mut self, bytes: &[u8]) -> bool {
        for &byte in bytes {
            if self.done {
                break;
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                    self.done = self.depth == 0;
                }
                continue;
            }

            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => {}
                b'"' => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                // A close at depth 0 is garbage; either way the read is over
                b'}' | b']' if self.depth <= 1 => self.done = true,
                b'}' | b']' => self.depth -= 1,
                // Scalars and garbage at the top level end the read at once
                _ if self.depth == 0 => self.done = true,
                _ => {}
            }
        }
        self.done
    }
}
