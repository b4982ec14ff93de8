//! Core BatchProcessor struct and public API methods

use super::execution::{ExecutionPlan, UnitOutcome};
use crate::config::models::batch::ProcessorConfig;
use crate::core::batch::dedup::{Deduplicator, UnitOfWork};
use crate::core::batch::types::{
    BatchMetadata, BatchOptions, BatchRequest, BatchResponse, BatchResult, ProcessorConfigView,
};
use crate::core::cache_manager::ResultCache;
use crate::core::dispatcher::RequestDispatcher;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Executes batches of sub-requests against a [`RequestDispatcher`].
///
/// The processor holds no per-batch state; every call to
/// [`process`](Self::process) builds its own execution context.
pub struct BatchProcessor {
    pub(super) config: ProcessorConfig,
    pub(super) dispatcher: Arc<RequestDispatcher>,
    pub(super) cache: Arc<dyn ResultCache>,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(
        config: ProcessorConfig,
        dispatcher: Arc<RequestDispatcher>,
        cache: Arc<dyn ResultCache>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            cache,
        }
    }

    /// Effective configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Configuration in its client-facing shape
    pub fn config_view(&self) -> ProcessorConfigView {
        ProcessorConfigView::from(&self.config)
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Process one batch.
    ///
    /// Per-request failures are reported inside the response. The only
    /// error returned is a failing cache lookup, which aborts the batch
    /// before any unit is dispatched.
    pub async fn process(
        &self,
        requests: Vec<BatchRequest>,
        options: &BatchOptions,
    ) -> Result<BatchResponse> {
        let started = Instant::now();
        let plan = self.plan(options);
        let units = Deduplicator::group(&requests, self.config.enable_deduplication);

        info!(
            requests = requests.len(),
            units = units.len(),
            parallel = plan.parallel,
            fail_fast = plan.fail_fast,
            timeout_ms = plan.timeout.as_millis() as u64,
            "Processing batch"
        );

        let ttls: Vec<Option<Duration>> = units
            .iter()
            .map(|unit| {
                if !plan.use_cache {
                    return None;
                }
                self.dispatcher.cache_ttl(&unit.request).map(|ttl| {
                    if ttl.is_zero() {
                        self.config.cache_ttl_duration()
                    } else {
                        ttl
                    }
                })
            })
            .collect();

        let mut outcomes = self.lookup_cache(&units, &ttls, plan.timeout).await?;
        self.execute_units(&units, &ttls, &plan, &mut outcomes).await;

        let outcomes: Vec<UnitOutcome> = outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap_or(UnitOutcome::Skipped))
            .collect();

        let results = fan_out(&requests, &units, &outcomes);
        let metadata = BatchMetadata::summarize(&results, units.len(), started.elapsed());

        debug!(
            success = metadata.success_count,
            errors = metadata.error_count,
            cached = metadata.cached_count,
            duration_ms = metadata.duration,
            "Batch settled"
        );

        Ok(BatchResponse {
            success: metadata.error_count == 0,
            results,
            metadata,
        })
    }

    fn plan(&self, options: &BatchOptions) -> ExecutionPlan {
        ExecutionPlan {
            timeout: options
                .timeout
                .map(Duration::from_millis)
                .unwrap_or_else(|| self.config.timeout_duration()),
            use_cache: options.use_cache.unwrap_or(self.config.use_cache),
            fail_fast: options.fail_fast.unwrap_or(false),
            parallel: options.parallel.unwrap_or(true),
            max_concurrency: self.config.max_concurrency.max(1),
        }
    }
}

/// One result per original request, in request order
fn fan_out(
    requests: &[BatchRequest],
    units: &[UnitOfWork],
    outcomes: &[UnitOutcome],
) -> Vec<BatchResult> {
    let mut unit_of = vec![0usize; requests.len()];
    for (unit_index, unit) in units.iter().enumerate() {
        for &position in &unit.positions {
            unit_of[position] = unit_index;
        }
    }

    requests
        .iter()
        .zip(unit_of)
        .map(|(request, unit_index)| outcomes[unit_index].to_result(&request.id))
        .collect()
}
