//! Batch processing types and data structures
//!
//! These are the wire shapes of `POST /api/batch`. Unknown fields and
//! unknown methods are rejected while deserializing, so everything past
//! the route handler works with well-formed values only.

use crate::config::models::batch::ProcessorConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// HTTP method of a sub-request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sub-request inside a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchRequest {
    /// Caller-supplied id, unique within the batch
    pub id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target path, always under `/api/`
    pub path: String,
    /// Query parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// Request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Extra headers passed to the handler; never part of the cache key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
}

impl BatchRequest {
    /// Convenience constructor used by tests and built-in callers
    pub fn new(id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            path: path.into(),
            params: None,
            body: None,
            headers: None,
        }
    }

    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// Per-batch overrides of the processor defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BatchOptions {
    /// Stop dispatching not-yet-started units after the first failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
    /// Per-unit timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Consult and populate the result cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,
    /// Run units concurrently (default) or strictly in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

/// Body of `POST /api/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchEnvelope {
    pub requests: Vec<BatchRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BatchOptions>,
}

/// Outcome of one sub-request, exactly one per request id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: u16,
    #[serde(default)]
    pub cached: bool,
    /// Milliseconds spent settling the unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Set when failFast prevented dispatch
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

/// Aggregate numbers for one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMetadata {
    pub total_requests: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub cached_count: usize,
    /// Wall-clock milliseconds from batch start to last settlement
    pub duration: u64,
    pub deduplicated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplicated_count: Option<usize>,
}

/// Successful response of `POST /api/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// True only when every sub-request succeeded
    pub success: bool,
    pub results: Vec<BatchResult>,
    pub metadata: BatchMetadata,
}

/// Client-facing view of [`ProcessorConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfigView {
    pub max_batch_size: usize,
    pub batch_window: u64,
    pub timeout: u64,
    pub enable_deduplication: bool,
    pub use_cache: bool,
}

impl From<&ProcessorConfig> for ProcessorConfigView {
    fn from(config: &ProcessorConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size,
            batch_window: config.batch_window,
            timeout: config.timeout,
            enable_deduplication: config.enable_deduplication,
            use_cache: config.use_cache,
        }
    }
}
