//! Cache manager implementation
//!
//! Two tiers: a small LRU for hot keys in front of a TTL map that holds
//! up to `max_entries` responses.

use super::types::{AtomicCacheStats, CacheEntry, CacheStats, CachedResponse};
use super::ResultCache;
use crate::config::models::cache::CacheConfig;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, info};

/// Multi-tier in-memory result cache
pub struct CacheManager {
    /// L1 cache: in-memory LRU for hot keys
    l1_cache: Arc<Mutex<LruCache<String, CacheEntry<CachedResponse>>>>,
    /// L2 cache: bounded TTL map
    l2_cache: Arc<DashMap<String, CacheEntry<CachedResponse>>>,
    config: CacheConfig,
    stats: Arc<AtomicCacheStats>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(config: CacheConfig) -> Result<Self> {
        if config.max_entries == 0 {
            return Err(GatewayError::Config(
                "Invalid cache configuration: max_entries must be greater than 0".to_string(),
            ));
        }

        let l1_capacity = NonZeroUsize::new(config.max_entries / 10)
            .or_else(|| NonZeroUsize::new(config.max_entries))
            .ok_or_else(|| GatewayError::Config("Invalid L1 cache capacity".to_string()))?;

        Ok(Self {
            l1_cache: Arc::new(Mutex::new(LruCache::new(l1_capacity))),
            l2_cache: Arc::new(DashMap::new()),
            config,
            stats: Arc::new(AtomicCacheStats::default()),
        })
    }

    fn lookup(&self, key: &str) -> Option<CachedResponse> {
        {
            let mut l1 = self.l1_cache.lock();
            if let Some(entry) = l1.get_mut(key) {
                if !entry.is_expired() {
                    entry.mark_accessed();
                    self.stats.l1_hits.fetch_add(1, Ordering::Relaxed);
                    debug!("L1 cache hit for key: {}", key);
                    return Some(entry.value.clone());
                }
                l1.pop(key);
            }
        }

        let expired = match self.l2_cache.get_mut(key) {
            Some(mut entry) if !entry.is_expired() => {
                entry.mark_accessed();
                let promoted = entry.clone();
                drop(entry);

                self.l1_cache.lock().put(key.to_string(), promoted.clone());
                self.stats.l2_hits.fetch_add(1, Ordering::Relaxed);
                debug!("L2 cache hit for key: {}", key);
                return Some(promoted.value);
            }
            Some(_) => true,
            None => false,
        };

        if expired && self.l2_cache.remove(key).is_some() {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            self.stats.entries.fetch_sub(1, Ordering::Relaxed);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn store(&self, key: &str, value: CachedResponse, ttl: Duration) {
        if !self.l2_cache.contains_key(key) && self.l2_cache.len() >= self.config.max_entries {
            self.make_room();
        }

        let entry = CacheEntry::new(value, ttl);
        if self.l2_cache.insert(key.to_string(), entry).is_none() {
            self.stats.entries.fetch_add(1, Ordering::Relaxed);
        }
        // Stale L1 copies would shadow the fresh value
        self.l1_cache.lock().pop(key);
        self.stats.writes.fetch_add(1, Ordering::Relaxed);

        debug!("Cached response for key: {} (ttl {:?})", key, ttl);
    }

    /// Drop expired entries, then the soonest-expiring one if still full
    fn make_room(&self) {
        let removed = self.cleanup_expired();

        if removed == 0 && self.l2_cache.len() >= self.config.max_entries {
            let victim = self
                .l2_cache
                .iter()
                .min_by_key(|entry| entry.value().expires_at)
                .map(|entry| entry.key().clone());

            if let Some(victim) = victim {
                if self.l2_cache.remove(&victim).is_some() {
                    self.l1_cache.lock().pop(&victim);
                    self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                    self.stats.entries.fetch_sub(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Clean up expired entries, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.l2_cache.len();
        self.l2_cache.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.l2_cache.len());

        if removed > 0 {
            self.stats
                .evictions
                .fetch_add(removed as u64, Ordering::Relaxed);
            self.stats.entries.store(self.l2_cache.len(), Ordering::Relaxed);
            info!("Cleaned up {} expired cache entries", removed);
        }

        removed
    }

    /// Get cache statistics (lock-free snapshot)
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    /// Number of live and not-yet-collected entries
    pub fn len(&self) -> usize {
        self.l2_cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.l2_cache.is_empty()
    }

    /// Whether the cache stores anything at all
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Clear all tiers
    pub fn clear(&self) {
        self.l1_cache.lock().clear();
        self.l2_cache.clear();
        self.stats.reset();

        info!("Result cache cleared");
    }
}

#[async_trait]
impl ResultCache for CacheManager {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        if !self.config.enabled {
            return Ok(None);
        }
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, value: CachedResponse, ttl: Duration) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        let ttl = if ttl.is_zero() {
            self.config.default_ttl_duration()
        } else {
            ttl
        };
        self.store(key, value, ttl);
        Ok(())
    }
}
