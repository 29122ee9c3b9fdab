//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a non-blocking listener
//! - One worker thread per connection
//! - Each connection carries exactly one request and one response

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
