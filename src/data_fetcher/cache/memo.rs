//! Single-flight memoization over an LRU map.

use lru::LruCache;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, instrument};

use super::types::CacheInfo;
use crate::error::AppError;

type Outcome<V> = Result<Arc<V>, Arc<AppError>>;
type Slot<V> = Arc<OnceCell<Outcome<V>>>;

/// Memoizes the result of an async computation per key.
///
/// The map lock is held only to find or create a key's slot. Each slot is a
/// `OnceCell` holding the outcome of one computation, so concurrent callers
/// for one key wait on it while other keys proceed independently. Callers
/// that joined a failed computation all receive its error. The caller that
/// ran it then removes the slot, and the next caller computes again.
pub struct MemoCache<K, V> {
    name: &'static str,
    slots: Mutex<LruCache<K, Slot<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
{
    /// A zero capacity is raised to one.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            slots: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the stored value for `key`, or runs `init` to produce it.
    ///
    /// Errors from a computation shared with other callers come back as
    /// [`AppError::Shared`].
    #[instrument(skip(self, init), fields(cache = self.name))]
    pub async fn get_or_try_init<F, Fut>(&self, key: K, init: F) -> Result<Arc<V>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots
                .get_or_insert(key.clone(), || Arc::new(OnceCell::new()))
                .clone()
        };

        let computed = AtomicBool::new(false);
        let outcome = slot
            .get_or_init(|| async {
                computed.store(true, Ordering::Relaxed);
                init().await.map(Arc::new).map_err(Arc::new)
            })
            .await;
        let computed = computed.load(Ordering::Relaxed);

        match outcome {
            Ok(value) => {
                if computed {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    debug!("Cache miss computed: cache={}, key={:?}", self.name, key);
                } else {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("Cache hit: cache={}, key={:?}", self.name, key);
                }
                Ok(Arc::clone(value))
            }
            Err(e) if computed => {
                debug!(
                    "Computation failed, dropping key: cache={}, key={:?}, error={}",
                    self.name, key, e
                );
                self.discard_failed_slot(&key, &slot).await;
                Err(AppError::Shared(Arc::clone(e)))
            }
            Err(e) => {
                debug!(
                    "Joined a failed computation: cache={}, key={:?}, error={}",
                    self.name, key, e
                );
                Err(AppError::Shared(Arc::clone(e)))
            }
        }
    }

    /// Removes `slot` unless the key already points at a newer one.
    async fn discard_failed_slot(&self, key: &K, slot: &Slot<V>) {
        let mut slots = self.slots.lock().await;
        if slots.peek(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.pop(key);
        }
    }

    /// Stored value for `key` without computing or touching recency.
    pub async fn peek(&self, key: &K) -> Option<Arc<V>> {
        let slots = self.slots.lock().await;
        slots.peek(key).and_then(stored_value)
    }

    pub async fn contains(&self, key: &K) -> bool {
        self.peek(key).await.is_some()
    }

    /// Forgets `key` so the next lookup recomputes it. Returns whether a
    /// value was stored.
    pub async fn invalidate(&self, key: &K) -> bool {
        let mut slots = self.slots.lock().await;
        let removed = slots
            .pop(key)
            .is_some_and(|slot| stored_value(&slot).is_some());
        if removed {
            info!("Invalidated cache entry: cache={}, key={:?}", self.name, key);
        }
        removed
    }

    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        let count = slots.len();
        slots.clear();
        info!("Cleared cache: cache={}, entries={}", self.name, count);
    }

    pub async fn info(&self) -> CacheInfo {
        let slots = self.slots.lock().await;
        CacheInfo {
            size: slots
                .iter()
                .filter(|(_, slot)| stored_value(slot).is_some())
                .count(),
            capacity: slots.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn stored_value<V>(slot: &Slot<V>) -> Option<Arc<V>> {
    slot.get().and_then(|outcome| outcome.as_ref().ok()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn unavailable() -> AppError {
        AppError::api_service_unavailable(503, "Service Unavailable", "stub://test")
    }

    #[tokio::test]
    async fn test_second_lookup_is_a_hit() {
        let cache: MemoCache<u16, String> = MemoCache::new("test", 4);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_try_init(2023, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("value".to_string())
                })
                .await
                .unwrap();
            assert_eq!(*value, "value");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let info = cache.info().await;
        assert_eq!((info.size, info.hits, info.misses), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_computation() {
        let cache: MemoCache<u16, usize> = MemoCache::new("test", 4);
        let calls = AtomicUsize::new(0);

        let lookup = || {
            cache.get_or_try_init(2023, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(42)
            })
        };

        let (a, b, c) = tokio::join!(lookup(), lookup(), lookup());

        assert_eq!((*a.unwrap(), *b.unwrap(), *c.unwrap()), (42, 42, 42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_compute_separately() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 4);

        let a = cache.get_or_try_init(2022, || async { Ok(2022) }).await.unwrap();
        let b = cache.get_or_try_init(2023, || async { Ok(2023) }).await.unwrap();

        assert_eq!((*a, *b), (2022, 2023));
        assert_eq!(cache.info().await.size, 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 4);

        let err = cache
            .get_or_try_init(2023, || async { Err(unavailable()) })
            .await
            .unwrap_err();
        assert!(err.is_remote_unavailable());
        assert!(!cache.contains(&2023).await);
        assert_eq!(cache.info().await.size, 0);

        let value = cache.get_or_try_init(2023, || async { Ok(7) }).await.unwrap();
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn test_waiters_share_a_failed_computation() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 4);
        let calls = AtomicUsize::new(0);

        let lookups = (0..8).map(|_| {
            cache.get_or_try_init(2023, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                Err(unavailable())
            })
        });
        let results = futures::future::join_all(lookups).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.as_ref().is_err_and(|e| e.is_retryable())));
        assert_eq!(cache.info().await.size, 0);
    }

    #[tokio::test]
    async fn test_caller_after_failure_starts_one_new_computation() {
        let cache: MemoCache<u16, usize> = MemoCache::new("test", 4);
        let calls = AtomicUsize::new(0);
        let (cache, calls) = (&cache, &calls);

        let lookup = |start_after: u64| async move {
            tokio::time::sleep(Duration::from_millis(start_after)).await;
            cache
                .get_or_try_init(2023, || async {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    if attempt == 0 { Err(unavailable()) } else { Ok(attempt) }
                })
                .await
        };

        // The second caller arrives while the first computation is running
        let (first, joined, late) = tokio::join!(lookup(0), lookup(10), lookup(150));

        assert!(first.is_err());
        assert!(joined.is_err());
        assert_eq!(*late.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.contains(&2023).await);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 4);
        cache.get_or_try_init(2023, || async { Ok(1) }).await.unwrap();

        assert!(cache.invalidate(&2023).await);
        assert!(!cache.invalidate(&2023).await);

        let value = cache.get_or_try_init(2023, || async { Ok(2) }).await.unwrap();
        assert_eq!(*value, 2);
    }

    #[tokio::test]
    async fn test_clear_and_capacity() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 2);
        for season in [2021, 2022, 2023] {
            cache
                .get_or_try_init(season, || async move { Ok(season) })
                .await
                .unwrap();
        }

        // Least recently used key is evicted past capacity
        assert!(!cache.contains(&2021).await);
        assert_eq!(cache.info().await.size, 2);
        assert_eq!(cache.info().await.capacity, 2);

        cache.clear().await;
        assert_eq!(cache.info().await.size, 0);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let cache: MemoCache<u16, u16> = MemoCache::new("test", 0);
        let info = futures::executor::block_on(cache.info());
        assert_eq!(info.capacity, 1);
    }
}
