use crate::builder::CacheBuilder;
use crate::error::BuildError;
use crate::shared::CacheShared;

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Duration;

/// A thread-safe, bounded LRU cache with per-entry TTL expiration and
/// eviction callbacks.
///
/// A `Cache` is a cheap-to-clone handle; clones share one underlying cache
/// and its background tasks.
#[derive(Debug)]
pub struct Cache<K: Send, V: Send + Sync, H = ahash::RandomState> {
  pub(crate) shared: Arc<CacheShared<K, V, H>>,
}

impl<K: Send, V: Send + Sync, H> Clone for Cache<K, V, H> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<K, V> Cache<K, V>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  /// Creates a bounded cache with a running background sweeper.
  ///
  /// `capacity` of zero disables size-triggered eviction; `sweep_interval`
  /// must be non-zero. Use [`CacheBuilder`] for the remaining knobs.
  pub fn new(capacity: usize, sweep_interval: Duration) -> Result<Self, BuildError> {
    CacheBuilder::new()
      .capacity(capacity)
      .sweep_interval(sweep_interval)
      .build()
  }
}

impl<K, V, H> Cache<K, V, H>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
  H: BuildHasher,
{
  /// Inserts a value with no expiration.
  ///
  /// If the key already exists its value is replaced, its expiration is
  /// cleared, the entry is promoted to most-recently-used, and the callback
  /// it was created with (if any) is kept. A new entry that pushes the
  /// cache over capacity evicts the least-recently-used entry.
  pub fn insert(&self, key: K, value: V) {
    self.shared.core.insert(key, value, Duration::ZERO, None);
  }

  /// Inserts a value that expires `ttl` after now.
  ///
  /// A zero `ttl` behaves like [`insert`](Self::insert): the entry never
  /// expires. Updates follow the same rules as `insert`, with the
  /// expiration reset to the new deadline.
  pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
    self.shared.core.insert(key, value, ttl, None);
  }

  /// As [`insert_with_ttl`](Self::insert_with_ttl), additionally attaching
  /// an eviction callback.
  ///
  /// The callback is invoked with the key and the value the entry held at
  /// removal, exactly once, whatever removes it: explicit `remove`,
  /// capacity eviction, expiration on read, or the sweeper. `clear` is the
  /// one exception and fires no callbacks.
  ///
  /// The callback attaches only when `key` is not already present. Updating
  /// an existing key through this method still replaces value and
  /// expiration, but the entry keeps the callback it was created with.
  ///
  /// In the default delivery mode the callback runs while the engine lock
  /// is held and must not call back into this cache. Build with
  /// [`CacheBuilder::deferred_callbacks`] to run callbacks on a dedicated
  /// thread where re-entry is safe.
  pub fn insert_with_ttl_and_callback<F>(&self, key: K, value: V, ttl: Duration, on_evicted: F)
  where
    F: Fn(K, Arc<V>) + Send + Sync + 'static,
  {
    self
      .shared
      .core
      .insert(key, value, ttl, Some(Arc::new(on_evicted)));
  }

  /// Fetches a value, marking the entry most-recently-used.
  ///
  /// Returns a clone of the `Arc` containing the value. An entry whose TTL
  /// has passed is removed on the spot, its callback fires, and the
  /// lookup reports `None`.
  pub fn get(&self, key: &K) -> Option<Arc<V>> {
    self.shared.core.get(key)
  }

  /// Peeks at a value without updating its recency.
  ///
  /// An expired entry is reported as `None` but left in place for the
  /// sweeper or a later `get` to reclaim. Never fires callbacks.
  pub fn peek(&self, key: &K) -> Option<Arc<V>> {
    self.shared.core.peek(key)
  }

  /// Removes an entry if present, firing its callback. A no-op when the
  /// key is absent.
  pub fn remove(&self, key: &K) {
    self.shared.core.remove(key);
  }

  /// Removes the least-recently-used entry, if any, firing its callback.
  pub fn evict_oldest(&self) {
    self.shared.core.evict_oldest();
  }

  /// The number of entries currently stored, expired ones included. O(1),
  /// performs no expiration checks.
  pub fn len(&self) -> usize {
    self.shared.core.len()
  }

  /// Returns `true` if the cache holds no entries.
  pub fn is_empty(&self) -> bool {
    self.shared.core.len() == 0
  }

  /// The configured maximum number of entries. Zero means unbounded.
  pub fn capacity(&self) -> usize {
    self.shared.core.capacity
  }

  /// Removes all entries at once. No callbacks fire on this path; the
  /// sweeper, if any, keeps running.
  pub fn clear(&self) {
    self.shared.core.clear();
  }

  /// Runs one bounded expiration pass on the calling thread, exactly as a
  /// sweeper tick would: examine up to a uniformly random number of entries
  /// in `[1, len]`, removing the expired ones found among them (their
  /// callbacks fire). Returns how many entries were removed.
  pub fn sweep_expired(&self) -> usize {
    self.shared.core.sweep_expired()
  }

  /// Stops the background tasks and waits for them to exit.
  ///
  /// After `shutdown` the cache itself remains fully usable: entries can
  /// still be inserted, read, and removed, and expired entries are still
  /// reclaimed lazily on `get`. What stops is the periodic sweeping, and in
  /// deferred mode the delivery of further callbacks; every callback queued
  /// before the call has run by the time it returns.
  ///
  /// Idempotent. Must not be called from inside an eviction callback.
  /// Dropping the last handle signals the same stop without blocking on
  /// the threads.
  pub fn shutdown(&self) {
    let sweeper = self.shared.sweeper.lock().take();
    if let Some(sweeper) = sweeper {
      sweeper.stop_and_join();
    }

    let notifier = self.shared.notifier.lock().take();
    if let Some(notifier) = notifier {
      notifier.stop_and_join();
    }
  }
}
