//! Batch execution and processing logic

use super::core::BatchProcessor;
use crate::core::batch::dedup::UnitOfWork;
use crate::core::batch::types::BatchResult;
use crate::core::cache_manager::{CachedResponse, ResultCache};
use crate::core::dispatcher::{DispatchBody, DispatchResponse, RequestDispatcher};
use crate::utils::error::{GatewayError, Result};
use futures::future::{join_all, try_join_all};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, warn};

/// Status reported for units skipped by failFast
pub const SKIPPED_STATUS: u16 = 424;
/// Status reported for units that exceeded their timeout
pub const TIMEOUT_STATUS: u16 = 504;

/// Options resolved against the processor defaults for one batch
#[derive(Debug, Clone, Copy)]
pub(super) struct ExecutionPlan {
    pub(super) timeout: Duration,
    pub(super) use_cache: bool,
    pub(super) fail_fast: bool,
    pub(super) parallel: bool,
    pub(super) max_concurrency: usize,
}

/// Terminal state of one unit of work
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOutcome {
    /// Served from the result cache
    Cached {
        response: CachedResponse,
        elapsed: Duration,
    },
    /// The handler answered, successfully or not
    Completed {
        response: DispatchResponse,
        elapsed: Duration,
    },
    TimedOut {
        timeout: Duration,
        elapsed: Duration,
    },
    /// Never dispatched because an earlier unit failed under failFast
    Skipped,
}

impl UnitOutcome {
    /// Whether this outcome trips failFast
    pub fn is_failure(&self) -> bool {
        match self {
            UnitOutcome::Cached { .. } => false,
            UnitOutcome::Completed { response, .. } => !response.is_success(),
            UnitOutcome::TimedOut { .. } => true,
            UnitOutcome::Skipped => false,
        }
    }

    /// Render the outcome for one of the request ids the unit answers
    pub fn to_result(&self, id: &str) -> BatchResult {
        let mut result = BatchResult {
            id: id.to_string(),
            success: false,
            data: None,
            error: None,
            status: 0,
            cached: false,
            duration: None,
            skipped: false,
        };

        match self {
            UnitOutcome::Cached { response, elapsed } => {
                result.success = (200..300).contains(&response.status);
                result.data = Some(response.data.clone());
                result.status = response.status;
                result.cached = true;
                result.duration = Some(millis(*elapsed));
            }
            UnitOutcome::Completed { response, elapsed } => {
                result.success = response.is_success();
                result.status = response.status;
                result.duration = Some(millis(*elapsed));
                match &response.body {
                    DispatchBody::Data(data) => {
                        if !result.success {
                            result.error = Some(error_message(data, response.status));
                        }
                        result.data = Some(data.clone());
                    }
                    DispatchBody::Error(message) => result.error = Some(message.clone()),
                }
            }
            UnitOutcome::TimedOut { timeout, elapsed } => {
                result.status = TIMEOUT_STATUS;
                result.error = Some(format!("Request timed out after {}ms", millis(*timeout)));
                result.duration = Some(millis(*elapsed));
            }
            UnitOutcome::Skipped => {
                result.status = SKIPPED_STATUS;
                result.error =
                    Some("Skipped: an earlier request in the batch failed (failFast)".to_string());
                result.skipped = true;
            }
        }

        result
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}

/// Pull a message out of an error payload, falling back to the status
fn error_message(data: &Value, status: u16) -> String {
    ["error", "message"]
        .iter()
        .find_map(|field| data.get(*field).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// Everything a unit needs once it leaves the processor
#[derive(Clone)]
struct UnitRunner {
    dispatcher: Arc<RequestDispatcher>,
    cache: Arc<dyn ResultCache>,
    timeout: Duration,
}

impl UnitRunner {
    /// Dispatch a unit whose deadline started at `started`.
    ///
    /// The cache write shares the deadline; a write still pending when it
    /// passes is abandoned and the dispatch result is kept.
    async fn run(
        &self,
        unit: &UnitOfWork,
        cache_ttl: Option<Duration>,
        started: Instant,
    ) -> UnitOutcome {
        let deadline = started + self.timeout;

        match timeout_at(deadline, self.dispatcher.dispatch(&unit.request)).await {
            Ok(response) => {
                let elapsed = started.elapsed();
                if response.is_success() {
                    if let (Some(ttl), DispatchBody::Data(data)) = (cache_ttl, &response.body) {
                        self.store(unit, response.status, data, ttl, deadline).await;
                    }
                } else {
                    warn!(
                        id = unit.lead_id(),
                        status = response.status,
                        "Sub-request {} {} failed",
                        unit.request.method,
                        unit.request.path
                    );
                }
                UnitOutcome::Completed { response, elapsed }
            }
            Err(_) => self.timed_out(unit, started),
        }
    }

    fn timed_out(&self, unit: &UnitOfWork, started: Instant) -> UnitOutcome {
        warn!(
            id = unit.lead_id(),
            timeout_ms = millis(self.timeout),
            "Sub-request {} {} timed out",
            unit.request.method,
            unit.request.path
        );
        UnitOutcome::TimedOut {
            timeout: self.timeout,
            elapsed: started.elapsed(),
        }
    }

    /// Cache writes are best effort
    async fn store(
        &self,
        unit: &UnitOfWork,
        status: u16,
        data: &Value,
        ttl: Duration,
        deadline: Instant,
    ) {
        let value = CachedResponse {
            status,
            data: data.clone(),
        };
        match timeout_at(deadline, self.cache.set(unit.key.as_str(), value, ttl)).await {
            Ok(Ok(())) => debug!(key = %unit.key, ttl_secs = ttl.as_secs(), "Cached sub-request result"),
            Ok(Err(e)) => warn!(key = %unit.key, "Failed to cache sub-request result: {}", e),
            Err(_) => warn!(key = %unit.key, "Cache write abandoned at the unit deadline"),
        }
    }
}

impl BatchProcessor {
    /// Look up the cache for every cacheable unit.
    ///
    /// Any lookup error aborts the whole batch, and so does a lookup still
    /// pending after `timeout`.
    pub(super) async fn lookup_cache(
        &self,
        units: &[UnitOfWork],
        ttls: &[Option<Duration>],
        timeout: Duration,
    ) -> Result<Vec<Option<UnitOutcome>>> {
        let deadline = Instant::now() + timeout;
        let lookups = units.iter().zip(ttls).map(|(unit, ttl)| async move {
            if ttl.is_none() {
                return Ok(None);
            }
            let started = Instant::now();
            let lookup = match timeout_at(deadline, self.cache.get(unit.key.as_str())).await {
                Ok(lookup) => lookup,
                Err(_) => {
                    error!(key = %unit.key, "Cache lookup timed out");
                    return Err(GatewayError::cache(format!(
                        "Cache lookup timed out after {}ms",
                        millis(timeout)
                    )));
                }
            };
            match lookup {
                Ok(Some(response)) => {
                    debug!(key = %unit.key, "Cache hit");
                    Ok(Some(UnitOutcome::Cached {
                        response,
                        elapsed: started.elapsed(),
                    }))
                }
                Ok(None) => {
                    debug!(key = %unit.key, "Cache miss");
                    Ok(None)
                }
                Err(e) => {
                    error!(key = %unit.key, "Cache lookup failed: {}", e);
                    Err(match e {
                        GatewayError::Cache(_) => e,
                        other => GatewayError::cache(format!("Cache lookup failed: {}", other)),
                    })
                }
            }
        });

        try_join_all(lookups).await
    }

    /// Dispatch every unit the cache did not answer
    pub(super) async fn execute_units(
        &self,
        units: &[UnitOfWork],
        ttls: &[Option<Duration>],
        plan: &ExecutionPlan,
        outcomes: &mut [Option<UnitOutcome>],
    ) {
        let pending: Vec<usize> = (0..units.len())
            .filter(|&index| outcomes[index].is_none())
            .collect();
        if pending.is_empty() {
            return;
        }

        let runner = UnitRunner {
            dispatcher: Arc::clone(&self.dispatcher),
            cache: Arc::clone(&self.cache),
            timeout: plan.timeout,
        };

        if plan.parallel {
            run_parallel(runner, units, ttls, plan, &pending, outcomes).await;
        } else {
            run_sequential(runner, units, ttls, plan, &pending, outcomes).await;
        }
    }
}

/// Strictly in request order, one unit settling before the next starts
async fn run_sequential(
    runner: UnitRunner,
    units: &[UnitOfWork],
    ttls: &[Option<Duration>],
    plan: &ExecutionPlan,
    pending: &[usize],
    outcomes: &mut [Option<UnitOutcome>],
) {
    let mut aborted = false;
    for &index in pending {
        if aborted {
            outcomes[index] = Some(UnitOutcome::Skipped);
            continue;
        }
        let outcome = runner.run(&units[index], ttls[index], Instant::now()).await;
        if plan.fail_fast && outcome.is_failure() {
            debug!(id = units[index].lead_id(), "failFast tripped");
            aborted = true;
        }
        outcomes[index] = Some(outcome);
    }
}

/// One task per unit, at most `max_concurrency` dispatching at once.
///
/// Every unit's deadline starts when its task is spawned, so waiting for a
/// permit counts against the timeout. A unit counts as started once it
/// holds a permit; failFast is checked at that point.
async fn run_parallel(
    runner: UnitRunner,
    units: &[UnitOfWork],
    ttls: &[Option<Duration>],
    plan: &ExecutionPlan,
    pending: &[usize],
    outcomes: &mut [Option<UnitOutcome>],
) {
    let semaphore = Arc::new(Semaphore::new(plan.max_concurrency));
    let aborted = Arc::new(AtomicBool::new(false));
    let fail_fast = plan.fail_fast;

    let tasks = pending.iter().map(|&index| {
        let runner = runner.clone();
        let unit = units[index].clone();
        let ttl = ttls[index];
        let semaphore = Arc::clone(&semaphore);
        let aborted = Arc::clone(&aborted);

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let deadline = started + runner.timeout;
            let outcome = match timeout_at(deadline, semaphore.acquire_owned()).await {
                Ok(Ok(_permit)) => {
                    if fail_fast && aborted.load(Ordering::Acquire) {
                        return UnitOutcome::Skipped;
                    }
                    runner.run(&unit, ttl, started).await
                }
                Ok(Err(_)) => return UnitOutcome::Skipped,
                Err(_) => {
                    if fail_fast && aborted.load(Ordering::Acquire) {
                        return UnitOutcome::Skipped;
                    }
                    runner.timed_out(&unit, started)
                }
            };
            if fail_fast && outcome.is_failure() {
                debug!(id = unit.lead_id(), "failFast tripped");
                aborted.store(true, Ordering::Release);
            }
            outcome
        });

        async move { (index, handle.await) }
    });

    for (index, joined) in join_all(tasks).await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = if e.is_panic() {
                    "Internal error: unit task panicked"
                } else {
                    "Internal error: unit task was cancelled"
                };
                error!(id = units[index].lead_id(), "{}", message);
                UnitOutcome::Completed {
                    response: DispatchResponse::error(500, message),
                    elapsed: Duration::ZERO,
                }
            }
        };
        outcomes[index] = Some(outcome);
    }
}
