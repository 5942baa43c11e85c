use crate::error::BuildError;
use crate::handle::Cache;
use crate::shared::{CacheCore, CacheShared, Delivery};
use crate::task::notifier::Notifier;
use crate::task::sweeper::Sweeper;

use core::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A builder for creating `Cache` instances.
///
/// The defaults are the quietest possible cache: unbounded, no background
/// sweeper, and eviction callbacks invoked inline.
pub struct CacheBuilder<K: Send, V: Send, H = ahash::RandomState> {
  pub(crate) capacity: usize,
  pub(crate) sweep_interval: Option<Duration>,
  deferred_callbacks: bool,
  hasher: H,
  _key_marker: PhantomData<K>,
  _value_marker: PhantomData<V>,
}

// Manual Debug implementation for CacheBuilder.
impl<K: Send, V: Send, H> fmt::Debug for CacheBuilder<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("capacity", &self.capacity)
      .field("sweep_interval", &self.sweep_interval)
      .field("deferred_callbacks", &self.deferred_callbacks)
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
// This impl block has no restrictive bounds on K or V.
impl<K: Send, V: Send, H> CacheBuilder<K, V, H> {
  /// Sets the maximum number of entries. A capacity of zero disables
  /// size-triggered eviction entirely.
  pub fn capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Sets the cache to be unbounded. Equivalent to `capacity(0)`.
  pub fn unbounded(mut self) -> Self {
    self.capacity = 0;
    self
  }

  /// Enables the background sweeper with the given tick interval. Without
  /// this call no sweeper thread is started and expired entries are only
  /// reclaimed lazily on access.
  ///
  /// The interval must be non-zero; `build` rejects a zero interval
  /// instead of spinning a busy loop.
  pub fn sweep_interval(mut self, interval: Duration) -> Self {
    self.sweep_interval = Some(interval);
    self
  }

  /// Routes eviction callbacks through a dedicated notifier thread instead
  /// of invoking them inline under the engine lock. Deferred callbacks may
  /// safely call back into the cache.
  pub fn deferred_callbacks(mut self) -> Self {
    self.deferred_callbacks = true;
    self
  }
}

// --- Default Constructor ---
impl<K: Send, V: Send, H: BuildHasher + Default> CacheBuilder<K, V, H> {
  /// Creates a new `CacheBuilder` with default settings.
  pub fn new() -> Self {
    Self {
      capacity: 0,
      sweep_interval: None,
      deferred_callbacks: false,
      hasher: H::default(),
      _key_marker: PhantomData,
      _value_marker: PhantomData,
    }
  }
}

impl<K: Send, V: Send> Default for CacheBuilder<K, V, ahash::RandomState> {
  fn default() -> Self {
    Self::new()
  }
}

// --- Build Methods ---
// This impl block carries the full set of trait bounds required to actually
// construct the cache, including `K: Clone` for the recency list.
impl<K, V, H> CacheBuilder<K, V, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  H: BuildHasher + Send + Sync + 'static,
{
  /// Sets the hasher for the key index.
  pub fn hasher(mut self, hasher: H) -> Self {
    self.hasher = hasher;
    self
  }

  /// Builds the cache and starts its background tasks.
  pub fn build(self) -> Result<Cache<K, V, H>, BuildError> {
    self.validate()?;

    let (delivery, notifier) = if self.deferred_callbacks {
      let (notifier, sender) = Notifier::spawn();
      (Delivery::Queued(sender), Some(notifier))
    } else {
      (Delivery::Inline, None)
    };

    let core = Arc::new(CacheCore::new(self.capacity, self.hasher, delivery));
    let sweeper = self
      .sweep_interval
      .map(|tick| Sweeper::spawn(Arc::clone(&core), tick));

    Ok(Cache {
      shared: Arc::new(CacheShared {
        core,
        sweeper: Mutex::new(sweeper),
        notifier: Mutex::new(notifier),
        sweep_interval: self.sweep_interval,
      }),
    })
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<(), BuildError> {
    if let Some(interval) = self.sweep_interval {
      if interval.is_zero() {
        return Err(BuildError::ZeroSweepInterval);
      }
    }
    Ok(())
  }
}
