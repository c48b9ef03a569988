//! Process-local TTL cache keyed by query signature.
//!
//! Entries expire lazily: a lookup that finds an entry older than the TTL
//! behaves as a miss, and the stale entry stays in place until the next
//! insert under the same signature overwrites it. The clock is injected so
//! expiry is testable without sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for the memory tier
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used in production
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    created: Instant,
}

/// Time-bounded map from query signature to a fully-formed response payload
pub struct MemoryCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a cache with the given TTL and the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock (used by tests)
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a signature. An entry older than the TTL is a miss.
    pub fn get(&self, signature: &str) -> Option<V> {
        let entries = self.entries.lock().expect("memory cache poisoned");
        let entry = entries.get(signature)?;
        if self.clock.now().duration_since(entry.created) >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert or overwrite the entry for a signature. Last writer wins.
    pub fn insert(&self, signature: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().expect("memory cache poisoned");
        entries.insert(
            signature.into(),
            Entry {
                value,
                created: self.clock.now(),
            },
        );
    }

    /// Drop every entry. Called by cache-priming runs so fresh disk blobs
    /// take effect immediately.
    pub fn clear(&self) {
        self.entries.lock().expect("memory cache poisoned").clear();
    }

    /// Number of stored entries, live or stale
    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory cache poisoned").len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a normalized signature from query components. Empty components
/// are kept as empty segments so (country, state) and (country, city)
/// queries can never collide.
pub fn signature(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that only advances when told to
    struct ManualClock {
        base: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + *self.offset.lock().unwrap()
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.insert("us|texas|||1|20", 42u64);
        assert_eq!(cache.get("us|texas|||1|20"), Some(42));
        assert_eq!(cache.get("us|nevada|||1|20"), None);
    }

    #[test]
    fn test_expiry_is_lazy() {
        let clock = Arc::new(ManualClock::new());
        let cache = MemoryCache::with_clock(Duration::from_secs(60), clock.clone());

        cache.insert("sig", "payload".to_string());
        assert!(cache.get("sig").is_some());

        clock.advance(Duration::from_secs(61));
        assert!(cache.get("sig").is_none());
        // Stale entry remains until overwritten
        assert_eq!(cache.len(), 1);

        cache.insert("sig", "fresh".to_string());
        assert_eq!(cache.get("sig").as_deref(), Some("fresh"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_signature_normalization() {
        assert_eq!(
            signature(&["US", "Texas", "", "Gyms", "1", "20"]),
            "us|texas||gyms|1|20"
        );
        // Empty segments keep positions distinct
        assert_ne!(
            signature(&["us", "austin", "", "1"]),
            signature(&["us", "", "austin", "1"])
        );
    }
}
