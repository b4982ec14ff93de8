//! Batch processing of sub-requests against the application's own API
//!
//! A batch is validated, grouped into units of work by [`CacheKey`],
//! served from the result cache where possible, dispatched under a
//! per-unit timeout, and fanned back out to one [`BatchResult`] per
//! original request id.

pub mod dedup;
mod processor;
pub mod types;
pub mod validation;


pub use dedup::{CacheKey, Deduplicator, UnitOfWork};
pub use processor::UnitOutcome;
pub use processor::core::BatchProcessor;
pub use types::{
    BatchEnvelope, BatchMetadata, BatchOptions, BatchRequest, BatchResponse, BatchResult,
    HttpMethod, ProcessorConfigView,
};
pub use validation::{BatchValidationError, FieldError, validate_envelope};
