use crate::entry::EvictionCallback;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

/// A message sent to the notifier task.
pub(crate) enum Notification<K, V> {
  /// An entry left the cache; run its callback with the key and value.
  Evicted(K, Arc<V>, EvictionCallback<K, V>),
  /// Stop the task. Messages queued ahead of this one are still delivered.
  Shutdown,
}

/// The background task responsible for running eviction callbacks outside
/// the engine lock when deferred delivery is enabled.
pub(crate) struct Notifier<K: Send, V: Send + Sync> {
  handle: JoinHandle<()>,
  sender: Sender<Notification<K, V>>,
}

impl<K, V> Notifier<K, V>
where
  K: Send + 'static,
  V: Send + Sync + 'static,
{
  /// Spawns a new notifier thread. The returned sender is the one the
  /// removal routine queues evictions on.
  pub(crate) fn spawn() -> (Self, Sender<Notification<K, V>>) {
    // Unbounded, so the removal routine never blocks on a slow callback.
    let (tx, rx) = unbounded::<Notification<K, V>>();

    let handle = thread::spawn(move || {
      // The loop also ends when the channel is disconnected, i.e. when
      // every sender (including the engine's) has been dropped.
      while let Ok(notification) = rx.recv() {
        match notification {
          Notification::Evicted(key, value, callback) => callback(key, value),
          Notification::Shutdown => break,
        }
      }
    });

    let notifier = Self {
      handle,
      sender: tx.clone(),
    };

    (notifier, tx)
  }
}

impl<K: Send, V: Send + Sync> Notifier<K, V> {
  /// Signals the notifier thread to stop without waiting for it.
  pub(crate) fn stop(self) {
    let _ = self.sender.send(Notification::Shutdown);
  }

  /// Signals the notifier thread to stop and waits until the callbacks
  /// queued so far have run.
  pub(crate) fn stop_and_join(self) {
    let _ = self.sender.send(Notification::Shutdown);
    let _ = self.handle.join();
  }
}
