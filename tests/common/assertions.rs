//! Custom test assertions
//!
//! Provides batch-specific assertions over typed and JSON responses.

use batch_gateway::core::batch::{BatchRequest, BatchResponse};
use serde_json::Value;

/// Assertions for BatchResponse
pub trait BatchResponseAssertions {
    /// One result per request, same ids, same order
    fn assert_matches_requests(&self, requests: &[BatchRequest]);

    /// Tallies agree with the results
    fn assert_metadata_consistent(&self);
}

impl BatchResponseAssertions for BatchResponse {
    fn assert_matches_requests(&self, requests: &[BatchRequest]) {
        assert_eq!(
            self.results.len(),
            requests.len(),
            "Expected one result per request"
        );
        for (i, (result, request)) in self.results.iter().zip(requests).enumerate() {
            assert_eq!(result.id, request.id, "Result {} is out of order", i);
        }
    }

    fn assert_metadata_consistent(&self) {
        let meta = &self.metadata;
        assert_eq!(meta.total_requests, self.results.len());
        assert_eq!(meta.success_count + meta.error_count, meta.total_requests);
        assert!(meta.cached_count <= meta.total_requests);
        assert_eq!(
            meta.success_count,
            self.results.iter().filter(|r| r.success).count()
        );
        assert_eq!(self.success, meta.error_count == 0);
        assert_eq!(meta.deduplicated_count.is_some(), meta.deduplicated);
    }
}

/// Ids of a JSON batch response, in order
pub fn result_ids(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
