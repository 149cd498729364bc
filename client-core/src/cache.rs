//! In-memory TTL cache with insertion-order eviction.
//!
//! Backs the per-manager response caches: entries are valid for a fixed
//! age, expired entries are evicted on access, and once the cache is at
//! capacity the earliest-inserted entry is evicted first (insertion
//! order, not access order). A miss always recomputes from the network;
//! no stale value is ever returned.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

pub struct TtlCache<V> {
    entries: HashMap<String, Entry<V>>,
    // Keys in insertion order; re-set moves a key to the back.
    order: VecDeque<String>,
    max_age: Duration,
    max_size: usize,
}

impl<V> TtlCache<V> {
    pub fn new(max_age: Duration, max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_age,
            max_size,
        }
    }

    /// Default sizing: 5 minute TTL, 100 entries.
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(300), 100)
    }

    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    /// Clock-injected variant of [`get`](Self::get) for deterministic tests.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some(entry) => now.duration_since(entry.inserted_at) >= self.max_age,
            None => return None,
        };

        if expired {
            self.remove(key);
            return None;
        }

        self.entries.get(key).map(|e| &e.value)
    }

    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Clock-injected variant of [`set`](Self::set) for deterministic tests.
    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: Instant) {
        let key = key.into();

        if self.entries.contains_key(&key) {
            // Refresh: move to the back of the insertion order.
            self.order.retain(|k| k != &key);
        } else if self.entries.len() >= self.max_size {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    pub fn contains(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.order.retain(|k| k != key);
        self.entries.remove(key).map(|e| e.value)
    }

    /// Remove every entry whose key matches the predicate. Used for
    /// targeted invalidation after mutations (e.g. all keys for one
    /// entity).
    pub fn remove_where(&mut self, predicate: impl Fn(&str) -> bool) {
        let doomed: Vec<String> = self
            .order
            .iter()
            .filter(|k| predicate(k))
            .cloned()
            .collect();
        for key in doomed {
            self.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
