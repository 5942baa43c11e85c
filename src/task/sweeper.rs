use crate::shared::CacheCore;

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

/// The background task responsible for reclaiming expired entries.
pub(crate) struct Sweeper {
  handle: JoinHandle<()>,
  stop_tx: Sender<()>,
}

impl Sweeper {
  /// Spawns a new sweeper thread. Each tick runs one bounded expiration
  /// pass over the engine; the stop signal is observed between passes,
  /// never mid-pass.
  pub(crate) fn spawn<K, V, H>(core: Arc<CacheCore<K, V, H>>, tick: Duration) -> Self
  where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    H: BuildHasher + Send + Sync + 'static,
  {
    let (stop_tx, stop_rx) = bounded::<()>(1);

    let handle = thread::spawn(move || {
      loop {
        // Waiting on the stop channel doubles as the tick timer, so a stop
        // interrupts the wait instead of running out the full interval.
        match stop_rx.recv_timeout(tick) {
          Err(RecvTimeoutError::Timeout) => {
            core.sweep_expired();
          }
          Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
      }
    });

    Self { handle, stop_tx }
  }

  /// Signals the sweeper thread to stop without waiting for it.
  pub(crate) fn stop(self) {
    let _ = self.stop_tx.try_send(());
  }

  /// Signals the sweeper thread to stop and waits for it to exit.
  pub(crate) fn stop_and_join(self) {
    let _ = self.stop_tx.try_send(());
    let _ = self.handle.join();
  }
}
