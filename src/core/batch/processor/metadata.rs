//! Result tallies

use crate::core::batch::types::{BatchMetadata, BatchResult};
use std::time::Duration;

impl BatchMetadata {
    /// Summarize settled results in one pass
    pub fn summarize(results: &[BatchResult], unit_count: usize, elapsed: Duration) -> Self {
        let (success_count, cached_count) =
            results.iter().fold((0, 0), |(success, cached), result| {
                (
                    success + usize::from(result.success),
                    cached + usize::from(result.cached),
                )
            });
        let total_requests = results.len();
        let deduplicated = unit_count < total_requests;

        Self {
            total_requests,
            success_count,
            error_count: total_requests - success_count,
            cached_count,
            duration: elapsed.as_millis() as u64,
            deduplicated,
            deduplicated_count: deduplicated.then(|| total_requests - unit_count),
        }
    }
}
