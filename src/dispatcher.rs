//! Dispatcher Module
//!
//! Routes validated requests to the category store.
//!
//! ## Responsibilities
//! - Match the method and validate path/body for it
//! - Resolve `/api/categories` and `/api/categories/<id>` routes
//! - Turn every outcome (including panics) into a response envelope

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::RequestError;
use crate::protocol::{encode_response, Method, Request, Response};
use crate::store::CategoryStore;

/// Route naming the whole collection
pub const COLLECTION_PATH: &str = "/api/categories";

/// Shape of a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// `/api/categories`
    Collection,

    /// `/api/categories/<id>`
    Item(i64),

    /// Anything else
    Other,
}

impl Route {
    fn parse(path: &str) -> Self {
        if path == COLLECTION_PATH {
            return Route::Collection;
        }

        let segments: Vec<&str> = path.split('/').collect();
        match segments.as_slice() {
            ["", "api", "categories", id] => id.parse().map(Route::Item).unwrap_or(Route::Other),
            _ => Route::Other,
        }
    }
}

/// A four-segment path whose last segment is not an integer.
///
/// Paths with any other segment count pass and are judged by [`Route`].
fn has_non_numeric_id(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    segments.len() == 4 && segments[3].parse::<i64>().is_err()
}

/// Maps requests onto the category store
pub struct Dispatcher {
    store: Arc<CategoryStore>,
}

impl Dispatcher {
    /// Create a dispatcher over an existing store
    pub fn new(store: Arc<CategoryStore>) -> Self {
        Self { store }
    }

    /// Create a dispatcher with a fresh store, seeded if the config asks
    pub fn from_config(config: &Config) -> Self {
        let store = if config.seed_store {
            CategoryStore::seeded()
        } else {
            CategoryStore::new()
        };
        Self::new(Arc::new(store))
    }

    /// Process one raw request payload into raw response bytes.
    ///
    /// This is the outermost boundary: nothing escapes it, a panic included.
    pub fn handle(&self, payload: &[u8]) -> Vec<u8> {
        encode_response(&guarded(|| self.process(payload)))
    }

    /// Parse a raw payload and dispatch it
    pub fn process(&self, payload: &[u8]) -> Response {
        match Request::parse(payload) {
            Ok(request) => self.dispatch(&request),
            Err(err) => {
                tracing::debug!("Rejected payload: {}", err);
                Response::Failure(err)
            }
        }
    }

    /// Dispatch a validated request
    pub fn dispatch(&self, request: &Request) -> Response {
        let response = self.execute(request).unwrap_or_else(Response::Failure);
        tracing::trace!(
            method = %request.method,
            path = %request.path,
            code = response.code(),
            "Dispatched request"
        );
        response
    }

    fn execute(&self, request: &Request) -> Result<Response, RequestError> {
        match request.method()? {
            Method::Create => {
                let (path, name) = Self::require_write(request)?;
                self.create(path, name)
            }
            Method::Update => {
                let (path, name) = Self::require_write(request)?;
                self.update(path, name)
            }
            Method::Read => {
                let path = Self::require_lookup(request)?;
                self.read(path)
            }
            Method::Delete => {
                let path = Self::require_lookup(request)?;
                self.delete(path)
            }
            Method::Echo => {
                let body = request.body.as_deref().ok_or(RequestError::MissingBody)?;
                Ok(Response::ok(body))
            }
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn require_path(request: &Request) -> Result<&str, RequestError> {
        if request.path.is_empty() {
            return Err(RequestError::MissingResource);
        }
        Ok(&request.path)
    }

    /// create/update: path, body, then a body of the form `{"name": "..."}`
    fn require_write(request: &Request) -> Result<(&str, String), RequestError> {
        let path = Self::require_path(request)?;
        let body = request.body.as_deref().ok_or(RequestError::MissingBody)?;
        Ok((path, parse_name(body)?))
    }

    /// read/delete: path, and no non-numeric id in a four-segment path
    fn require_lookup(request: &Request) -> Result<&str, RequestError> {
        let path = Self::require_path(request)?;
        if has_non_numeric_id(path) {
            return Err(RequestError::BadRequest);
        }
        Ok(path)
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    fn create(&self, path: &str, name: String) -> Result<Response, RequestError> {
        if Route::parse(path) != Route::Collection {
            return Err(RequestError::BadRequest);
        }

        let category = self.store.insert(name);
        tracing::debug!("Created category {}", category.id);
        Ok(Response::created(to_json(&category)?))
    }

    fn update(&self, path: &str, name: String) -> Result<Response, RequestError> {
        let Route::Item(id) = Route::parse(path) else {
            return Err(RequestError::BadRequest);
        };

        if !self.store.rename(id, name) {
            return Err(RequestError::NotFound);
        }
        Ok(Response::updated())
    }

    fn read(&self, path: &str) -> Result<Response, RequestError> {
        match Route::parse(path) {
            Route::Collection => Ok(Response::ok(to_json(&self.store.list())?)),
            Route::Item(id) => {
                let category = self.store.get(id).ok_or(RequestError::NotFound)?;
                Ok(Response::ok(to_json(&category)?))
            }
            Route::Other => Err(RequestError::BadRequest),
        }
    }

    fn delete(&self, path: &str) -> Result<Response, RequestError> {
        let Route::Item(id) = Route::parse(path) else {
            return Err(RequestError::BadRequest);
        };

        if !self.store.remove(id) {
            return Err(RequestError::NotFound);
        }
        tracing::debug!("Deleted category {}", id);
        Ok(Response::ok("Ok"))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the backing store
    pub fn store(&self) -> &Arc<CategoryStore> {
        &self.store
    }
}

/// The `name` of a body that must be a JSON object
fn parse_name(body: &str) -> Result<String, RequestError> {
    let value: Value = serde_json::from_str(body).map_err(|_| RequestError::InvalidBody)?;
    match value.get("name") {
        Some(Value::String(name)) => Ok(name.clone()),
        _ => Err(RequestError::InvalidBody),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RequestError> {
    serde_json::to_string(value).map_err(|e| RequestError::Internal(e.to_string()))
}

/// Run request processing, turning a panic into a code-6 response
fn guarded<F: FnOnce() -> Response>(process: F) -> Response {
    panic::catch_unwind(AssertUnwindSafe(process)).unwrap_or_else(|cause| {
        let message = panic_message(cause.as_ref());
        tracing::error!("Request processing panicked: {}", message);
        Response::Failure(RequestError::Internal(message))
    })
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic".to_string()
    }
}
