//! Envelope validation performed by the gateway before any unit runs

use super::types::{BatchEnvelope, BatchOptions};
use crate::config::models::batch::{MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
use crate::utils::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Prefix every sub-request path must carry
pub const API_PREFIX: &str = "/api/";

/// Path of the batch endpoint itself; batches cannot nest
pub const BATCH_PATH: &str = "/api/batch";

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every problem found in one envelope
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchValidationError {
    pub errors: Vec<FieldError>,
}

impl BatchValidationError {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for BatchValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "Invalid batch request: {}", joined)
    }
}

impl std::error::Error for BatchValidationError {}

impl From<&BatchValidationError> for GatewayError {
    fn from(report: &BatchValidationError) -> Self {
        GatewayError::validation(report.to_string())
    }
}

/// Validate an envelope against the processor's size limit.
///
/// All problems are collected rather than stopping at the first one.
pub fn validate_envelope(
    envelope: &BatchEnvelope,
    max_batch_size: usize,
) -> Result<(), BatchValidationError> {
    let mut report = BatchValidationError::default();

    let count = envelope.requests.len();
    if count == 0 {
        report.push("requests", "At least one request is required");
    } else if count > max_batch_size {
        report.push(
            "requests",
            format!("Maximum {} requests per batch, got {}", max_batch_size, count),
        );
    }

    let mut seen = HashSet::with_capacity(count);
    for (index, request) in envelope.requests.iter().enumerate() {
        if request.id.trim().is_empty() {
            report.push(format!("requests[{}].id", index), "Request id must not be empty");
        } else if !seen.insert(request.id.as_str()) {
            report.push(
                format!("requests[{}].id", index),
                format!("Duplicate request id '{}'", request.id),
            );
        }

        validate_path(&request.path, index, &mut report);
    }

    if let Some(options) = &envelope.options {
        validate_options(options, &mut report);
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(report)
    }
}

fn validate_path(path: &str, index: usize, report: &mut BatchValidationError) {
    let field = format!("requests[{}].path", index);

    if !path.starts_with(API_PREFIX) {
        report.push(field, format!("Path must start with {}", API_PREFIX));
        return;
    }

    if path.chars().any(char::is_whitespace) {
        report.push(field, "Path must not contain whitespace");
        return;
    }

    let route = path.split('?').next().unwrap_or(path).trim_end_matches('/');
    if route == BATCH_PATH {
        report.push(field, "Nested batch requests are not allowed");
    }
}

fn validate_options(options: &BatchOptions, report: &mut BatchValidationError) {
    if let Some(timeout) = options.timeout {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout) {
            report.push(
                "options.timeout",
                format!(
                    "Timeout must be between {} and {} ms",
                    MIN_TIMEOUT_MS, MAX_TIMEOUT_MS
                ),
            );
        }
    }
}
