//! Cache keys and grouping of identical sub-requests into units of work

use super::types::{BatchRequest, HttpMethod};
use crate::core::dispatcher::split_path;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Identity of a sub-request: method, bare path, merged params and body.
///
/// Headers are not part of the key. Query strings are folded into the params,
/// absent params equal `{}` and an absent body equals `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_request(request: &BatchRequest) -> Self {
        let (route, mut params) = split_path(&request.path);
        if let Some(explicit) = &request.params {
            params.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let body = request.body.as_ref().unwrap_or(&Value::Null);
        Self::from_parts(request.method, route.trim_end_matches('/'), params, body)
    }

    /// Hashes the compact JSON of params and body. `serde_json::Map` keeps
    /// keys sorted unless the `preserve_order` feature is on, which this
    /// crate does not enable.
    fn from_parts(method: HttpMethod, route: &str, params: Map<String, Value>, body: &Value) -> Self {
        let canonical = format!("{}\n{}", Value::Object(params), body);
        let digest = Sha256::digest(canonical.as_bytes());
        Self(format!("{} {}#{}", method, route, hex::encode(digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A group of sub-requests sharing one key, executed once
#[derive(Debug, Clone)]
pub struct UnitOfWork {
    pub key: CacheKey,
    /// The first request of the group; the one actually dispatched
    pub request: BatchRequest,
    /// Positions in the original batch answered by this unit
    pub positions: Vec<usize>,
}

impl UnitOfWork {
    pub fn lead_id(&self) -> &str {
        &self.request.id
    }
}

/// Groups a batch into units of work
pub struct Deduplicator;

impl Deduplicator {
    /// Units are returned in order of first occurrence. With `enabled`
    /// false every request is its own unit.
    pub fn group(requests: &[BatchRequest], enabled: bool) -> Vec<UnitOfWork> {
        let mut units: Vec<UnitOfWork> = Vec::with_capacity(requests.len());
        let mut index: HashMap<CacheKey, usize> = HashMap::with_capacity(requests.len());

        for (position, request) in requests.iter().enumerate() {
            let key = CacheKey::for_request(request);
            if enabled {
                if let Some(&unit) = index.get(&key) {
                    units[unit].positions.push(position);
                    continue;
                }
                index.insert(key.clone(), units.len());
            }
            units.push(UnitOfWork {
                key,
                request: request.clone(),
                positions: vec![position],
            });
        }

        units
    }
}
