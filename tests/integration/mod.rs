//! Integration tests for batch-gateway
//!
//! These tests verify the interaction between multiple components
//! and test real system behavior. Mocks are reserved for the unit
//! tests inside the crate.

pub mod batch_route_tests;
pub mod config_validation_tests;
pub mod error_handling_tests;
