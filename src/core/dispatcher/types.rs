//! Request and response types seen by handlers

use crate::core::batch::HttpMethod;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A sub-request after routing
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub method: HttpMethod,
    /// Path without its query string
    pub path: String,
    /// Values captured by `{name}` segments of the matched pattern
    pub path_params: HashMap<String, String>,
    /// Query string pairs merged with the explicit params; explicit params win
    pub params: Map<String, Value>,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl DispatchRequest {
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Payload of a handler response
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchBody {
    Data(Value),
    Error(String),
}

/// What a handler produced for one sub-request
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub status: u16,
    pub body: DispatchBody,
}

impl DispatchResponse {
    /// 200 with a JSON payload
    pub fn ok(data: Value) -> Self {
        Self::with_status(200, data)
    }

    pub fn with_status(status: u16, data: Value) -> Self {
        Self {
            status,
            body: DispatchBody::Data(data),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: DispatchBody::Error(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Split `path?query` into the bare path and its decoded query pairs.
///
/// A key repeated in the query string keeps its last value.
pub fn split_path(path: &str) -> (&str, Map<String, Value>) {
    match path.split_once('?') {
        Some((route, query)) => {
            let params = url::form_urlencoded::parse(query.as_bytes())
                .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
                .collect();
            (route, params)
        }
        None => (path, Map::new()),
    }
}
