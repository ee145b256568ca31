//! Load counters for development-time introspection.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use super::cache::{CacheKey, ResourceCache};

pub type SharedStats = Rc<RefCell<LoadStats>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Every network attempt, including retries.
    pub network_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Calls that joined a load already in flight for the same key.
    pub deduplicated: u64,
    /// Loads that exhausted every attempt.
    pub failures: u64,
    /// Latency of the most recent successful load per `language/namespace`.
    pub load_times_ms: BTreeMap<String, f64>,
}

impl LoadStats {
    pub fn shared() -> SharedStats {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn record_load_time(&mut self, key: &CacheKey, elapsed_ms: f64) {
        self.load_times_ms.insert(key.to_string(), elapsed_ms);
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }

    pub fn snapshot(&self, cache: &ResourceCache) -> StatsSnapshot {
        StatsSnapshot {
            cache_size: cache.len(),
            cache_capacity: cache.capacity(),
            network_requests: self.network_requests,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            deduplicated: self.deduplicated,
            failures: self.failures,
            hit_rate: self.hit_rate(),
            load_times_ms: self.load_times_ms.clone(),
        }
    }
}

/// Read-only view of the cache and loader counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub cache_size: usize,
    pub cache_capacity: usize,
    pub network_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub deduplicated: u64,
    pub failures: u64,
    pub hit_rate: f64,
    pub load_times_ms: BTreeMap<String, f64>,
}
