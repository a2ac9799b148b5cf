//! Exchange-scoped objects owned by the host.
//!
//! Each HTTP exchange gets its own [`Exchange`], which bundles the request,
//! the response (once one exists) and a free-form [`Context`] that hooks use
//! to hand state forward. Hooks borrow the exchange mutably for the duration
//! of one invocation; nothing here is shared across exchanges.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    /// Create a new random exchange ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outgoing HTTP request as seen by hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// HTTP method.
    pub method: String,
    /// Target URL.
    pub url: String,
    /// Query string parameters.
    #[serde(default)]
    pub query: Map<String, Value>,
    /// Request headers.
    #[serde(default)]
    pub headers: Map<String, Value>,
    /// Request body.
    #[serde(default)]
    pub body: Value,
}

impl ApiRequest {
    /// Create a request with empty query, headers and body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            query: Map::new(),
            headers: Map::new(),
            body: Value::Null,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Set a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self::get("")
    }
}

/// HTTP response as seen by after-request hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Status code.
    pub status: u16,
    /// Status reason phrase.
    #[serde(default)]
    pub status_text: String,
    /// Response headers.
    #[serde(default)]
    pub headers: Map<String, Value>,
    /// Parsed payload, when the body was a JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl ApiResponse {
    /// Create a response with no headers or data.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Map::new(),
            data: None,
        }
    }

    /// Shorthand for `200 OK`.
    pub fn ok() -> Self {
        Self::new(200, "OK")
    }

    /// Set the payload.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Set a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Key/value state carried across the hooks of one exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Everything a hook may read or mutate during one exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// Exchange identifier.
    pub id: ExchangeId,
    /// The outgoing request.
    pub request: ApiRequest,
    /// The response, once the request has been sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ApiResponse>,
    /// Hook-to-hook state.
    #[serde(default)]
    pub context: Context,
}

impl Exchange {
    /// Start a new exchange for the given request.
    pub fn new(request: ApiRequest) -> Self {
        Self {
            id: ExchangeId::new(),
            request,
            response: None,
            context: Context::new(),
        }
    }

    /// Attach the response.
    pub fn with_response(mut self, response: ApiResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Seed the context.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}
