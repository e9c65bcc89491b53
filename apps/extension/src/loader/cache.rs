//! Bounded response cache with least-recently-used eviction and absolute TTL

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use super::value::Loaded;

struct CacheEntry {
    value: Loaded,
    inserted_at: Instant,
}

/// Cache of successful loader results keyed by canonical cache key
///
/// An entry is dropped when the entry cap is exceeded (least recently used
/// first) or once it is older than the TTL, whichever happens first. A
/// capacity of zero disables caching.
pub(crate) struct ResponseCache {
    entries: Option<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub(crate) fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            ttl,
        }
    }

    /// Look up a live entry, marking it as recently used
    pub(crate) fn get(&mut self, key: &str) -> Option<Loaded> {
        let entries = self.entries.as_mut()?;
        let expired = entries.peek(key)?.inserted_at.elapsed() >= self.ttl;
        if expired {
            entries.pop(key);
            debug!(key, reason = "expired", "Removed from cache");
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub(crate) fn insert(&mut self, key: String, value: Loaded) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        if let Some((evicted, _)) = entries.push(key.clone(), entry) {
            if evicted != key {
                debug!(key = %evicted, reason = "evicted", "Removed from cache");
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub(crate) fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::value::Page;

    fn value() -> Loaded {
        Loaded::Tags(Page::default())
    }

    #[test]
    fn test_get_returns_inserted_value() {
        let mut cache = ResponseCache::new(4, Duration::from_secs(60));
        cache.insert("a".to_string(), value());
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_least_recently_used_is_evicted_first() {
        let mut cache = ResponseCache::new(2, Duration::from_secs(60));
        cache.insert("a".to_string(), value());
        cache.insert("b".to_string(), value());
        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), value());

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_expired_entry_is_absent_below_capacity() {
        let mut cache = ResponseCache::new(100, Duration::from_millis(20));
        cache.insert("a".to_string(), value());
        std::thread::sleep(Duration::from_millis(40));

        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_reading_does_not_extend_ttl() {
        let mut cache = ResponseCache::new(100, Duration::from_millis(60));
        cache.insert("a".to_string(), value());
        std::thread::sleep(Duration::from_millis(35));
        assert!(cache.get("a").is_some());
        std::thread::sleep(Duration::from_millis(35));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = ResponseCache::new(0, Duration::from_secs(60));
        cache.insert("a".to_string(), value());
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut cache = ResponseCache::new(4, Duration::from_secs(60));
        cache.insert("a".to_string(), value());
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
