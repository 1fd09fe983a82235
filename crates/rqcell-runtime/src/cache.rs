//! The query cache
//!
//! One entry per [`QueryKey`]. Each entry publishes its [`QueryState`] on a
//! `watch` channel and owns an async lock that serializes fetches, which is
//! what lets concurrent observers of one key share a single request.
//!
//! Entries nobody holds or subscribes to are dropped by
//! [`QueryCache::evict_idle`] once unused for longer than the cache time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::debug;

use crate::DataObject;
use crate::key::QueryKey;
use crate::result::QueryState;

#[derive(Debug)]
pub struct CacheEntry {
    state: watch::Sender<QueryState>,
    fetch_lock: Mutex<()>,
    last_used: SyncMutex<Instant>,
}

impl CacheEntry {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            state,
            fetch_lock: Mutex::new(()),
            last_used: SyncMutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_used.lock() = Instant::now();
    }

    fn has_subscribers(&self) -> bool {
        self.state.receiver_count() > 0
    }

    /// Current state (cloned)
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut QueryState)) {
        self.state.send_modify(f);
    }

    /// Wait for any fetch in progress on this entry
    pub(crate) async fn lock_fetch(&self) -> MutexGuard<'_, ()> {
        self.fetch_lock.lock().await
    }

    /// True when a fetch settled after `since`
    pub(crate) fn settled_since(&self, since: Instant) -> bool {
        self.state
            .borrow()
            .settled_at
            .is_some_and(|at| at > since)
    }
}

/// Shared cache of query states
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Arc<CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `key`, created empty on first use
    pub fn entry(&self, key: &QueryKey) -> Arc<CacheEntry> {
        if let Some(entry) = self.entries.get(key) {
            entry.touch();
            return Arc::clone(entry.value());
        }
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(key = %key, "cache miss, new entry");
                Arc::new(CacheEntry::new())
            });
        entry.touch();
        Arc::clone(entry.value())
    }

    /// Current state of `key`, if it was ever used
    pub fn get(&self, key: &QueryKey) -> Option<QueryState> {
        self.entries.get(key).map(|entry| entry.state())
    }

    pub fn get_data(&self, key: &QueryKey) -> Option<DataObject> {
        self.entries.get(key).and_then(|entry| entry.state().data)
    }

    /// Seed data for `key` as if it had just been fetched
    pub fn set_data(&self, key: &QueryKey, data: DataObject) {
        debug!(key = %key, "seeding cache entry");
        self.entry(key).update(|state| state.seed(data));
    }

    /// Mark `key` stale so the next observer refetches. Returns false when
    /// the key is unknown.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.get(key) {
            Some(entry) => {
                debug!(key = %key, "invalidating");
                entry.update(|state| state.is_invalidated = true);
                true
            }
            None => false,
        }
    }

    /// Drop entries unused for longer than `cache_time`. Entries that are
    /// being fetched, held elsewhere or subscribed to are kept. Returns the
    /// number of entries removed.
    pub fn evict_idle(&self, cache_time: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let in_use = Arc::strong_count(entry) > 1 || entry.has_subscribers();
            let keep = in_use || entry.last_used.lock().elapsed() < cache_time;
            if !keep {
                debug!(key = %key, "evicting idle entry");
            }
            keep
        });
        before.saturating_sub(self.entries.len())
    }

    pub fn remove(&self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
