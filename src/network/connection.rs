//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{self, ErrorKind, Read};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::error::{CatalogError, RequestError, Result};
use crate::protocol::{encode_response, read_payload, write_payload, Response};

/// Longest wait for the client to finish sending after the response
const LINGER_TIMEOUT: Duration = Duration::from_millis(500);

/// Most bytes discarded while lingering
const LINGER_MAX_BYTES: u64 = 64 * 1024;

/// Handles a single client connection
pub struct Connection {
    stream: TcpStream,

    /// Reference to the request dispatcher
    dispatcher: Arc<Dispatcher>,

    /// Peer address for logging
    peer_addr: String,

    /// Request size cap
    max_request_bytes: usize,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>, max_request_bytes: usize) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Accepted sockets may inherit the listener's non-blocking mode
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            dispatcher,
            peer_addr,
            max_request_bytes,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Serve the single exchange on this connection, then close it.
    ///
    /// Client disconnects and read timeouts end the connection quietly.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let response = match read_payload(&mut self.stream, self.max_request_bytes) {
            Ok(payload) => {
                tracing::trace!("Received {} bytes from {}", payload.len(), self.peer_addr);
                self.dispatcher.handle(&payload)
            }
            Err(CatalogError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Client {} disconnected before sending a request", self.peer_addr);
                return Ok(());
            }
            Err(CatalogError::Io(ref e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                // Windows reports TimedOut where Unix reports WouldBlock
                tracing::debug!("Read timeout for client {}", self.peer_addr);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                encode_response(&Response::Failure(RequestError::MalformedPayload(e.to_string())))
            }
        };

        if let Err(e) = write_payload(&mut self.stream, &response) {
            if let CatalogError::Io(ref io_err) = e {
                if is_disconnect(io_err.kind()) {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr, e
                    );
                    return Ok(());
                }
            }
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            return Err(e);
        }

        self.linger_close();
        tracing::debug!("Connection closed for {}", self.peer_addr);
        Ok(())
    }

    /// Half-close, then discard whatever the client still sends.
    ///
    /// Closing with unread input makes the kernel reset the connection,
    /// which can destroy the response before the client reads it.
    fn linger_close(&mut self) {
        if self.stream.shutdown(Shutdown::Write).is_err() {
            return;
        }
        let _ = self.stream.set_read_timeout(Some(LINGER_TIMEOUT));
        let _ = io::copy(&mut (&self.stream).take(LINGER_MAX_BYTES), &mut io::sink());
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
