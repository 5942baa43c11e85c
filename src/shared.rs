use crate::entry::{CacheEntry, EvictionCallback};
use crate::list::LruList;
use crate::task::notifier::{Notification, Notifier};
use crate::task::sweeper::Sweeper;
use crate::time;

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossbeam_utils::CachePadded;
use generational_arena::Index;
use parking_lot::Mutex;
use rand::Rng;

/// How the removal routine hands an evicted entry to its callback: invoked
/// inline while the engine lock is held, or queued to the notifier task.
pub(crate) enum Delivery<K, V> {
  Inline,
  Queued(Sender<Notification<K, V>>),
}

/// The single-lock cache engine. Every operation that touches the recency
/// list runs under the mutex for its full duration, reads included, since
/// a read promotes its entry and may remove it.
pub(crate) struct CacheCore<K, V, H> {
  pub(crate) list: CachePadded<Mutex<LruList<K, V, H>>>,
  pub(crate) capacity: usize,
  pub(crate) delivery: Delivery<K, V>,
}

impl<K, V, H> CacheCore<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub(crate) fn new(capacity: usize, hasher: H, delivery: Delivery<K, V>) -> Self {
    Self {
      list: CachePadded::new(Mutex::new(LruList::with_hasher(hasher))),
      capacity,
      delivery,
    }
  }

  /// Insert or update. An existing key keeps the callback it was created
  /// with and `on_evicted` is ignored; a new key is admitted at the head,
  /// then the tail is evicted if the cache went over capacity.
  pub(crate) fn insert(
    &self,
    key: K,
    value: V,
    ttl: Duration,
    on_evicted: Option<EvictionCallback<K, V>>,
  ) {
    let mut list = self.list.lock();

    if let Some(index) = list.index_of(&key) {
      list.node_mut(index).entry.update(value, ttl);
      list.move_to_front(index);
      return;
    }

    list.push_front(key, CacheEntry::new(value, ttl, on_evicted));
    if self.capacity > 0 && list.len() > self.capacity {
      // len > capacity >= 1 here, so the tail is never the fresh entry.
      if let Some(tail) = list.tail_index() {
        self.remove_index(&mut list, tail);
      }
    }
  }

  /// Lookup with promotion. An entry found expired is removed on the spot,
  /// its callback fires, and the lookup reports a miss.
  pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
    let mut list = self.list.lock();
    let index = list.index_of(key)?;

    if list.node(index).entry.is_expired(time::now_nanos()) {
      self.remove_index(&mut list, index);
      return None;
    }

    list.move_to_front(index);
    Some(list.node(index).entry.value())
  }

  /// Lookup without promotion. An expired entry is reported as a miss but
  /// left in place for the sweeper or a later `get` to reclaim.
  pub(crate) fn peek(&self, key: &K) -> Option<Arc<V>> {
    let list = self.list.lock();
    let index = list.index_of(key)?;
    let entry = &list.node(index).entry;

    if entry.is_expired(time::now_nanos()) {
      None
    } else {
      Some(entry.value())
    }
  }

  pub(crate) fn remove(&self, key: &K) {
    let mut list = self.list.lock();
    if let Some(index) = list.index_of(key) {
      self.remove_index(&mut list, index);
    }
  }

  pub(crate) fn evict_oldest(&self) {
    let mut list = self.list.lock();
    if let Some(tail) = list.tail_index() {
      self.remove_index(&mut list, tail);
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.list.lock().len()
  }

  /// Drops every entry wholesale. No callback fires on this path.
  pub(crate) fn clear(&self) {
    self.list.lock().clear();
  }

  /// One bounded expiration pass: examine up to a uniformly random number
  /// of entries in `[1, len]` and remove the expired ones found among them.
  /// Returns how many entries were removed.
  pub(crate) fn sweep_expired(&self) -> usize {
    let mut list = self.list.lock();
    let len = list.len();
    if len == 0 {
      return 0;
    }

    let mut rng = rand::rng();
    let budget = rng.random_range(1..=len);

    let victims = list.expired_handles(budget, time::now_nanos());
    let removed = victims.len();
    for index in victims {
      self.remove_index(&mut list, index);
    }
    removed
  }

  /// The single point through which an entry leaves the cache, whatever
  /// the cause: detach it from the recency list and the key index, then
  /// deliver the key and value to the entry's callback.
  fn remove_index(&self, list: &mut LruList<K, V, H>, index: Index) {
    let node = list.remove(index);
    let key = node.key;
    let (value, on_evicted) = node.entry.into_parts();

    if let Some(callback) = on_evicted {
      match &self.delivery {
        Delivery::Inline => callback(key, value),
        Delivery::Queued(sender) => {
          // Disconnection means the notifier is gone after a shutdown; the
          // callback is dropped along with the entry.
          let _ = sender.send(Notification::Evicted(key, value, callback));
        }
      }
    }
  }
}

/// The state shared by every handle to one cache: the engine plus the
/// background tasks tied to its lifetime.
pub(crate) struct CacheShared<K: Send, V: Send + Sync, H> {
  pub(crate) core: Arc<CacheCore<K, V, H>>,
  pub(crate) sweeper: Mutex<Option<Sweeper>>,
  pub(crate) notifier: Mutex<Option<Notifier<K, V>>>,
  pub(crate) sweep_interval: Option<Duration>,
}

impl<K: Send, V: Send + Sync, H> fmt::Debug for CacheShared<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheShared")
      .field("capacity", &self.core.capacity)
      .field("sweep_interval", &self.sweep_interval)
      .finish_non_exhaustive()
  }
}

impl<K: Send, V: Send + Sync, H> Drop for CacheShared<K, V, H> {
  fn drop(&mut self) {
    // Signal the background tasks without joining them. A join here could
    // deadlock when the last handle is dropped from a deferred callback
    // running on the notifier thread itself.
    if let Some(sweeper) = self.sweeper.get_mut().take() {
      sweeper.stop();
    }
    if let Some(notifier) = self.notifier.get_mut().take() {
      notifier.stop();
    }
  }
}
