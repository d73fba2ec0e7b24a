//! Time- and size-bounded cache of analysis results
//!
//! Keyed by identity key (never by image bytes), so two photos of the same
//! film share an entry.
//!
//! **Expiry:** entries older than the TTL are treated as absent and removed
//! when looked up.
//!
//! **Eviction:** insertion order, not LRU. Reads do not refresh an entry's
//! position; once the cache holds more than `capacity` entries the oldest
//! insertion is dropped. Overwriting a key replaces the value and restarts
//! its TTL but keeps its original place in the eviction order.

use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use unhyped_common::Clock;

use crate::models::AnalysisResult;

/// One cached analysis
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub stored_at: DateTime<Utc>,
    pub value: AnalysisResult,
}

/// Result cache with injected clock, TTL and capacity
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
    /// Keys, oldest insertion first
    order: VecDeque<String>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            ttl,
            capacity: capacity.max(1),
            clock,
        }
    }

    /// Cached value for `key`, or `None` when absent or expired
    pub fn get(&mut self, key: &str) -> Option<AnalysisResult> {
        let now = self.clock.now();
        let expired = {
            let entry = self.entries.get(key)?;
            now.signed_duration_since(entry.stored_at) > self.ttl
        };

        if expired {
            tracing::debug!(key, "Cache entry expired");
            self.remove(key);
            return None;
        }

        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, evicting the oldest insertion past capacity
    pub fn set(&mut self, key: &str, value: AnalysisResult) {
        let entry = CacheEntry {
            key: key.to_string(),
            stored_at: self.clock.now(),
            value,
        };

        if self.entries.insert(key.to_string(), entry).is_some() {
            return;
        }
        self.order.push_back(key.to_string());

        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            tracing::debug!(key = %oldest, "Evicting oldest cache entry");
            self.entries.remove(&oldest);
        }
    }

    /// Number of stored entries (expired ones included until looked up)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}
