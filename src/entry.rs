use crate::time;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The hook an entry carries from creation to removal. The removal routine
/// invokes it with the key and the value the entry held at that moment.
pub(crate) type EvictionCallback<K, V> = Arc<dyn Fn(K, Arc<V>) + Send + Sync>;

/// A container for a value in the cache, holding all necessary metadata.
pub(crate) struct CacheEntry<K, V> {
  /// The user's value, wrapped in an Arc for cheap shared ownership.
  value: Arc<V>,
  /// The expiration timestamp in nanoseconds since the cache epoch.
  /// 0 means the entry never expires.
  expires_at: u64,
  /// Fired at most once, when the entry leaves the cache.
  on_evicted: Option<EvictionCallback<K, V>>,
}

impl<K, V> CacheEntry<K, V> {
  /// Creates a new `CacheEntry`. A zero `ttl` means the entry never
  /// expires.
  pub(crate) fn new(value: V, ttl: Duration, on_evicted: Option<EvictionCallback<K, V>>) -> Self {
    Self {
      value: Arc::new(value),
      expires_at: time::expiry_nanos(ttl),
      on_evicted,
    }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  /// Checks if the entry is expired at `now` (nanoseconds since the cache
  /// epoch). Sentinel entries never expire.
  #[inline]
  pub(crate) fn is_expired(&self, now: u64) -> bool {
    self.expires_at != 0 && now > self.expires_at
  }

  /// Replaces the value and expiration in place. The callback the entry was
  /// created with persists across updates.
  pub(crate) fn update(&mut self, value: V, ttl: Duration) {
    self.value = Arc::new(value);
    self.expires_at = time::expiry_nanos(ttl);
  }

  /// Consumes the entry, yielding the pieces the removal routine delivers
  /// to the callback.
  pub(crate) fn into_parts(self) -> (Arc<V>, Option<EvictionCallback<K, V>>) {
    (self.value, self.on_evicted)
  }
}

impl<K, V> fmt::Debug for CacheEntry<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheEntry")
      .field("expires_at", &self.expires_at)
      .field("has_callback", &self.on_evicted.is_some())
      .finish_non_exhaustive()
  }
}
