//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (one exchange per connection)
//!
//! ### Request
//! ```text
//! { "method": "create" | "update" | "read" | "delete" | "echo",
//!   "date":   <unix seconds>,
//!   "path":   "<optional>",
//!   "body":   "<optional, a JSON object encoded as a string for create/update>" }
//! ```
//!
//! ### Response Envelope
//! ```text
//! { "status": "<code> <phrase>", "body": <string or null> }
//! ```
//!
//! ### Status Codes
//! - 1: Ok
//! - 2: Created
//! - 3: Updated
//! - 4: Bad request family (reason names the problem)
//! - 5: Not found
//! - 6: Malformed payload / internal error

mod request;
mod response;
mod codec;

pub use request::{Method, Request};
pub use response::{Envelope, Response, Status};
pub use codec::{
    decode_envelope, encode_request, encode_response, read_payload, write_payload,
};
