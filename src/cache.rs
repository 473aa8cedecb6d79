// Generic TTL cache backing all memoized external calls.
// Flight searches are the main customer but any caller may store JSON payloads here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

// Counters for cache behavior, readable through stats()
#[derive(Debug, Default)]
struct CacheCounters {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    expired_count: AtomicUsize,
    write_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub expired_count: usize,
    pub write_count: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    // None means the entry never expires on its own
    expiry: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        match self.expiry {
            Some(at) => Instant::now() > at,
            None => false,
        }
    }
}

/// Key-value store with per-entry expiry. Entries are overwritten wholesale on
/// refresh, never updated in place. An empty array or object is a valid cached
/// value and is reported as a hit, distinct from an absent key.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<String, CacheEntry>,
    counters: CacheCounters,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, evicting it first if its expiry has passed.
    pub fn get(&self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if !entry.is_expired() {
                    self.counters.hit_count.fetch_add(1, Ordering::Relaxed);
                    debug!(key, "cache hit");
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.counters.expired_count.fetch_add(1, Ordering::Relaxed);
            debug!(key, "cache entry expired, removed");
        }
        self.counters.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Stores a value under the key. A `ttl` of `None` or zero keeps the entry
    /// until it is explicitly removed.
    pub fn put(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let expiry = match ttl {
            Some(d) if !d.is_zero() => Some(Instant::now() + d),
            _ => None,
        };
        self.entries
            .insert(key.to_string(), CacheEntry { value, expiry });
        self.counters.write_count.fetch_add(1, Ordering::Relaxed);
        debug!(key, ttl_ms = ttl.map(|d| d.as_millis() as u64), "cache set");
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Typed read. A payload that no longer deserializes as `T` is dropped and
    /// treated as a miss rather than surfaced to the caller.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(key, %err, "cached payload no longer deserializes, evicting");
                self.remove(key);
                None
            }
        }
    }

    /// Typed write. Serialization failures are logged and the call proceeds
    /// without caching; they never propagate to the caller.
    pub fn put_as<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        match serde_json::to_value(value) {
            Ok(json) => self.put(key, json, ttl),
            Err(err) => warn!(key, %err, "cache write skipped"),
        }
    }

    /// Evicts every entry whose expiry has passed. Entries without an expiry
    /// are left untouched.
    pub fn sweep(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let cleared = before.saturating_sub(self.entries.len());
        if cleared > 0 {
            self.counters
                .expired_count
                .fetch_add(cleared, Ordering::Relaxed);
            debug!(cleared, "cache sweep complete");
        }
        cleared
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.entries.len(),
            hit_count: self.counters.hit_count.load(Ordering::Relaxed),
            miss_count: self.counters.miss_count.load(Ordering::Relaxed),
            expired_count: self.counters.expired_count.load(Ordering::Relaxed),
            write_count: self.counters.write_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_round_trip_returns_deep_equal_value() {
        let cache = CacheStore::new();

        let payloads = vec![
            json!({"nested": {"list": [1, 2, 3], "flag": true}}),
            json!([]),
            json!({}),
            json!("plain string"),
            json!(null),
        ];

        for (i, payload) in payloads.into_iter().enumerate() {
            let key = format!("key{}", i);
            cache.put(&key, payload.clone(), Some(Duration::from_secs(60)));
            assert_eq!(cache.get(&key), Some(payload), "round trip for {}", key);
        }
    }

    #[test]
    fn test_empty_array_is_a_hit_not_absent() {
        let cache = CacheStore::new();
        cache.put("empty", json!([]), Some(Duration::from_secs(60)));

        assert_eq!(cache.get("empty"), Some(json!([])));
        assert_eq!(cache.get("never_written"), None);

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
    }

    #[test]
    fn test_expired_entry_reports_absent_and_is_removed() {
        let cache = CacheStore::new();
        cache.put("short", json!(42), Some(Duration::from_millis(1)));

        thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.get("short"), None);
        let stats = cache.stats();
        assert_eq!(stats.items_count, 0);
        assert_eq!(stats.expired_count, 1);
    }

    #[test]
    fn test_no_ttl_lives_until_removed() {
        let cache = CacheStore::new();
        cache.put("forever", json!("v"), None);
        cache.put("zero", json!("v"), Some(Duration::ZERO));

        thread::sleep(Duration::from_millis(5));

        assert!(cache.get("forever").is_some());
        assert!(cache.get("zero").is_some());

        cache.remove("forever");
        assert_eq!(cache.get("forever"), None);
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let cache = CacheStore::new();
        cache.put("k", json!("old"), Some(Duration::from_millis(1)));
        cache.put("k", json!("new"), Some(Duration::from_secs(60)));

        thread::sleep(Duration::from_millis(5));

        // Overwritten wholesale: new value, new expiry
        assert_eq!(cache.get("k"), Some(json!("new")));
    }

    #[test]
    fn test_sweep_evicts_only_expired_entries() {
        let cache = CacheStore::new();
        cache.put("expired1", json!(1), Some(Duration::from_millis(1)));
        cache.put("expired2", json!(2), Some(Duration::from_millis(1)));
        cache.put("live", json!(3), Some(Duration::from_secs(60)));
        cache.put("eternal", json!(4), None);

        thread::sleep(Duration::from_millis(5));

        assert_eq!(cache.sweep(), 2);
        assert!(cache.get("live").is_some());
        assert!(cache.get("eternal").is_some());
        assert_eq!(cache.stats().items_count, 2);
    }

    #[test]
    fn test_typed_helpers_round_trip() {
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Record {
            id: String,
            price: f64,
        }

        let cache = CacheStore::new();
        let records = vec![
            Record {
                id: "a".to_string(),
                price: 100.0,
            },
            Record {
                id: "b".to_string(),
                price: 250.5,
            },
        ];

        cache.put_as("records", &records, Some(Duration::from_secs(60)));
        let restored: Vec<Record> = cache.get_as("records").expect("cached records");
        assert_eq!(restored, records);

        // A payload of the wrong shape is evicted and treated as a miss
        cache.put("records", json!("not a list"), Some(Duration::from_secs(60)));
        let bad: Option<Vec<Record>> = cache.get_as("records");
        assert!(bad.is_none());
        assert_eq!(cache.get("records"), None);
    }
}
