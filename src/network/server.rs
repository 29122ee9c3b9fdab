//! TCP Server
//!
//! Accepts connections and dispatches each to its own worker thread.

use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;

use super::Connection;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{CatalogError, RequestError, Result};
use crate::protocol::{encode_response, write_payload, Response};

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for catalogd
pub struct Server {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,

    /// Connections currently being served
    active: Arc<AtomicUsize>,
}

/// Stops a running [`Server`] from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

/// Decrements the live connection count when a worker ends
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Server {
    /// Create a new server with the given config and dispatcher
    pub fn new(config: Config, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bind the listen address. Returns the bound address (useful with port 0).
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            CatalogError::Network(format!("Failed to bind {}: {}", self.config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Handle for stopping the accept loop
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Start the server (blocking).
    ///
    /// Returns after shutdown is signalled and every in-flight connection
    /// has been answered.
    pub fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| CatalogError::Network("Listener not bound".to_string()))?;

        let workers = WaitGroup::new();

        while !self.shutdown.load(Ordering::Acquire) {
            match listener.accept() {
                Ok((stream, peer)) => self.dispatch_connection(stream, peer, &workers),
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL_INTERVAL),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => tracing::warn!("Accept failed: {}", e),
            }
        }

        tracing::info!(
            "Shutdown requested, waiting for {} connection(s)",
            self.active.load(Ordering::Acquire)
        );
        workers.wait();
        Ok(())
    }

    /// Spawn a worker for the connection, or turn it away when at capacity
    fn dispatch_connection(&self, stream: TcpStream, peer: SocketAddr, workers: &WaitGroup) {
        let active = self.active.fetch_add(1, Ordering::AcqRel);
        let guard = ActiveGuard(Arc::clone(&self.active));

        if active >= self.config.max_connections {
            tracing::warn!("Connection limit reached, rejecting {}", peer);
            reject(stream);
            return;
        }

        // Kept back so a failed spawn can still answer the client
        let fallback = match stream.try_clone() {
            Ok(fallback) => Some(fallback),
            Err(e) => {
                tracing::debug!("Failed to clone stream for {}: {}", peer, e);
                None
            }
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let config = self.config.clone();
        let worker = workers.clone();

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let _worker = worker;
                let _guard = guard;
                if let Err(e) = serve(stream, dispatcher, &config) {
                    tracing::warn!("Connection {} failed: {}", peer, e);
                }
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn worker for {}: {}", peer, e);
            if let Some(stream) = fallback {
                reject(stream);
            }
        }
    }
}

fn serve(stream: TcpStream, dispatcher: Arc<Dispatcher>, config: &Config) -> Result<()> {
    let mut connection = Connection::new(stream, dispatcher, config.max_request_bytes)?;
    connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
    connection.handle()
}

/// Answer with a "server busy" envelope and half-close
fn reject(mut stream: TcpStream) {
    let _ = stream.set_nonblocking(false);
    let busy = Response::Failure(RequestError::Internal("server busy".to_string()));
    if let Err(e) = write_payload(&mut stream, &encode_response(&busy)) {
        tracing::debug!("Failed to send busy response: {}", e);
    }
    let _ = stream.shutdown(Shutdown::Write);
}
