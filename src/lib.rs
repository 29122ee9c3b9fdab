//! # catalogd
//!
//! A tiny request/response server for a single `categories` collection:
//! - One JSON request and one JSON response per TCP connection
//! - Create / read / update / delete plus an `echo` method
//! - In-memory store behind a single lock
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one worker thread per connection)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw payload
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Request Model                             │
//! │              (parse JSON, validate method/date)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │
//! │           (method + path routing, body checks)               │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐               ┌──────────────────┐
//!   │  CategoryStore  │               │  Response Codec  │
//!   │     (Mutex)     │               │ {status, body}   │
//!   └─────────────────┘               └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod dispatcher;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CatalogError, RequestError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of catalogd
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
