//! TTL key/value store backing the cache-aside data fetcher.
//!
//! All entries share a single TTL, a deliberate simplification rather than
//! per-resource tuning. The store is internally synchronized so a future
//! parallel consumer cannot corrupt it; expiry is a read-only check on `get`,
//! expired entries are overwritten by the next `set`.

use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// The TTL shared by every cache entry.
pub const CACHE_TTL: Duration = Duration::from_secs(600);

/// A cached opaque value with its storage timestamp.
struct CacheEntry {
    value: Box<dyn Any + Send + Sync>,
    stored_at: Instant,
}

/// An internally synchronized TTL key/value store.
#[derive(Clone)]
pub struct Cache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// Creates a cache with the standard TTL.
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Creates a cache with a custom TTL. Used by tests to exercise expiry.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: Arc::new(Mutex::new(HashMap::new())), ttl }
    }

    /// Returns the cached value for `key` if it is fresh and of the expected
    /// type.
    ///
    /// A type mismatch is treated as "no usable value", never a crash: the
    /// mismatch is logged and the caller proceeds as on a miss.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, key: &str) -> Option<T> {
        // A panic mid-insert cannot leave a partial entry, so a poisoned
        // lock still guards a usable map.
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = entries.get(key)?;

        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }

        match entry.value.downcast_ref::<T>() {
            Some(value) => Some(value.clone()),
            None => {
                tracing::warn!(key, "Cache entry has unexpected type, treating as miss.");
                None
            }
        }
    }

    /// Stores or overwrites a value under `key`, resetting its timestamp.
    pub fn set<T: Send + Sync + 'static>(&self, key: &str, value: T) {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(
            key.to_string(),
            CacheEntry { value: Box::new(value), stored_at: Instant::now() },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_same_value() {
        let cache = Cache::new();
        cache.set("validator:cosmos:xxx", "moniker".to_string());
        assert_eq!(cache.get::<String>("validator:cosmos:xxx"), Some("moniker".to_string()));
    }

    #[test]
    fn expired_entry_reports_not_found() {
        let cache = Cache::with_ttl(Duration::from_millis(10));
        cache.set("key", 42u64);
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(cache.get::<u64>("key"), None);
    }

    #[test]
    fn type_mismatch_is_treated_as_miss() {
        let cache = Cache::new();
        cache.set("key", 42u64);
        assert_eq!(cache.get::<String>("key"), None);
        // The correctly typed value is still there.
        assert_eq!(cache.get::<u64>("key"), Some(42));
    }

    #[test]
    fn poisoned_lock_is_recovered_and_the_cache_stays_usable() {
        let cache = Cache::new();
        cache.set("key", 7u64);

        let poisoner = cache.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(panicked.is_err());

        assert_eq!(cache.get::<u64>("key"), Some(7));
        cache.set("key", 8u64);
        assert_eq!(cache.get::<u64>("key"), Some(8));
    }

    #[test]
    fn set_overwrites_and_refreshes() {
        let cache = Cache::with_ttl(Duration::from_millis(50));
        cache.set("key", 1u64);
        cache.set("key", 2u64);
        assert_eq!(cache.get::<u64>("key"), Some(2));
    }
}
