//! Session-lifetime keyed memo cache with single-flight fetches.
//!
//! [`MemoCache`] backs every data domain in the store. It is a concurrent
//! map from a domain key (a semester or exam-event identifier) to a fetched
//! payload, with two guarantees on top of plain memoization:
//!
//! - **Idempotent writes**: once a key holds a payload, a later insert for
//!   the same key is a no-op. Readers hand out `Arc` clones and never see an
//!   entry change underneath them.
//! - **Single-flight fetches**: concurrent callers asking for the same
//!   absent key share one producer call. The first caller reserves the slot
//!   with a `Pending(Notify)` marker and runs the producer; everyone else
//!   waits on the notification and re-reads. A failed producer removes the
//!   reservation and wakes the waiters so one of them can retry with its own
//!   producer.
//!
//! There is no eviction and no TTL: the cache lives for the session and is
//! bounded by the number of semesters a student has. [`MemoCache::clear`]
//! exists for logout only.

use crate::core::PortalError;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Notify;

/// State of one cache slot.
///
/// The slot moves `Pending(notify) -> Ready(value)` exactly once on success,
/// or `Pending(notify) -> removed` when the producer fails. `Notify` only
/// wakes futures that are already waiting, so waiters create their
/// `notified()` future before re-checking the slot (see `get_or_fetch`).
enum FetchState<V> {
    /// Another task is fetching this key; wait on the handle.
    Pending(Arc<Notify>),
    /// The payload is cached and immutable for the rest of the session.
    Ready(Arc<V>),
}

/// Keyed memo cache for one data domain.
pub struct MemoCache<V> {
    entries: DashMap<String, FetchState<V>>,
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up a cached payload. Pending slots read as absent.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries.get(key).and_then(|entry| match entry.value() {
            FetchState::Ready(value) => Some(value.clone()),
            FetchState::Pending(_) => None,
        })
    }

    /// Whether a payload is cached for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert a payload for `key`. First write wins: if the key already
    /// holds a payload the call is a no-op, so a cached entry is never
    /// silently replaced with different data.
    pub fn insert(&self, key: &str, value: V) -> Arc<V> {
        use dashmap::mapref::entry::Entry;

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => match occupied.get() {
                FetchState::Ready(existing) => existing.clone(),
                FetchState::Pending(notify) => {
                    let notify = notify.clone();
                    let value = Arc::new(value);
                    occupied.insert(FetchState::Ready(value.clone()));
                    notify.notify_waiters();
                    value
                }
            },
            Entry::Vacant(slot) => {
                let value = Arc::new(value);
                slot.insert(FetchState::Ready(value.clone()));
                value
            }
        }
    }

    /// Fetch-if-absent. Returns the cached payload when present; otherwise
    /// runs `producer` (at most one in-flight call per key across all
    /// concurrent callers), caches the result, and returns it.
    ///
    /// On producer failure the slot is left empty so a later call can retry,
    /// and the error propagates to every caller that was sharing this fetch
    /// attempt's reservation (waiters re-enter the loop and one of them
    /// becomes the next producer).
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, producer: F) -> Result<Arc<V>, PortalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, PortalError>>,
    {
        use dashmap::mapref::entry::Entry;

        let notify = Arc::new(Notify::new());

        loop {
            match self.entries.entry(key.to_string()) {
                Entry::Occupied(occupied) => match occupied.get() {
                    FetchState::Ready(value) => return Ok(value.clone()),
                    FetchState::Pending(existing) => {
                        let existing = existing.clone();
                        // Create the notified future BEFORE releasing the
                        // entry, otherwise a wakeup between the release and
                        // the await is lost - Notify only wakes futures that
                        // are already registered.
                        let notified = existing.notified();
                        drop(occupied);
                        notified.await;
                        // Slot settled (Ready or removed); re-check from the top.
                    }
                },
                Entry::Vacant(slot) => {
                    slot.insert(FetchState::Pending(notify.clone()));
                    break;
                }
            }
        }

        // This task holds the reservation; it is the only producer for this
        // key until the slot settles.
        match producer().await {
            Ok(value) => {
                let value = Arc::new(value);
                self.entries
                    .insert(key.to_string(), FetchState::Ready(value.clone()));
                notify.notify_waiters();
                Ok(value)
            }
            Err(err) => {
                self.entries.remove(key);
                notify.notify_waiters();
                Err(err)
            }
        }
    }

    /// Number of cached payloads (pending slots excluded).
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.value(), FetchState::Ready(_)))
            .count()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything. Logout only.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn second_fetch_returns_identical_cached_value() {
        let cache: MemoCache<String> = MemoCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch("sem1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("payload".to_string())
            })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("sem1", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("other".to_string())
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_producer_call() {
        let cache: Arc<MemoCache<u32>> = Arc::new(MemoCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("sem1", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(42)
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(*handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_no_entry_so_retry_works() {
        let cache: MemoCache<u32> = MemoCache::new();

        let err = cache
            .get_or_fetch("sem1", || async {
                Err(PortalError::ServerUnavailable)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::ServerUnavailable));
        assert!(!cache.contains("sem1"));

        let value = cache.get_or_fetch("sem1", || async { Ok(7) }).await.unwrap();
        assert_eq!(*value, 7);
    }

    #[tokio::test]
    async fn insert_is_first_write_wins() {
        let cache: MemoCache<u32> = MemoCache::new();
        let first = cache.insert("k", 1);
        let second = cache.insert("k", 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*cache.get("k").unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_cache() {
        let cache: MemoCache<u32> = MemoCache::new();
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }
}
