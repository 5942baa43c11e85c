//! Background tasks owned by the cache: the sweeper that reclaims expired
//! entries and the notifier that runs deferred eviction callbacks.

pub(crate) mod notifier;
pub(crate) mod sweeper;
