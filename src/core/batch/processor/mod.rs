//! Batch processor module
//!
//! The processor is split into logical components:
//! - `core`: the `BatchProcessor` struct and its public entry point
//! - `execution`: unit outcomes, cache probing and sequential/parallel dispatch
//! - `metadata`: result tallies computed after every unit has settled

pub mod core;
mod execution;
mod metadata;

pub use execution::UnitOutcome;
