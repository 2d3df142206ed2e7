//! Request and response descriptors exchanged between the hosting adapter,
//! the middleware chain and the item operations.

use crate::ids::RequestId;
use crate::store::StoreError;
use http::Method;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Maximum inline path parameters before heap allocation
pub const MAX_INLINE_PARAMS: usize = 4;

/// Header storage: names are `Arc<str>` (repeated, cheap to clone), values
/// are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Path parameters extracted by the dispatch layer.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Request data handed to an item operation.
///
/// The body is kept as raw bytes: decoding is part of each operation so that
/// an unreadable body surfaces as that operation's failure.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path
    pub path: String,
    /// Path parameters extracted from the URL
    pub path_params: ParamVec,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Raw request body, if any
    pub body: Option<Vec<u8>>,
}

impl HandlerRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            path_params: ParamVec::new(),
            headers: HeaderVec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_path_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.path_params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics when a name repeats.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as a JSON object.
    ///
    /// An absent or zero-length body reads as `{}`. Bytes that are not
    /// UTF-8, text that is not JSON, or JSON that is not an object, are a
    /// [`StoreError::Codec`].
    pub fn json_body(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match self.body.as_deref() {
            None | Some([]) => return Ok(Map::new()),
            Some(raw) => std::str::from_utf8(raw)
                .map_err(|e| StoreError::Codec(format!("request body is not UTF-8: {e}")))?,
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(StoreError::Codec(format!(
                "request body must be a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(StoreError::Codec(format!("malformed request body: {e}"))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Response produced by an item operation and decorated by middleware.
///
/// `body` is `None` for responses that carry an empty string on the wire
/// (delete, preflight).
#[derive(Debug, Clone)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// HTTP response headers
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Option<Value>,
}

impl HandlerResponse {
    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// Create a response whose body is the empty string
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: None,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// The body as it goes on the wire: serialized JSON or the empty string.
    #[must_use]
    pub fn body_text(&self) -> String {
        match &self.body {
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }
}
