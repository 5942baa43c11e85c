//! An in-process, bounded LRU cache with per-entry TTL expiration,
//! per-entry eviction callbacks, and a background sweeper that reclaims
//! expired entries probabilistically.
//!
//! # Features
//! - **Bounded LRU**: A capacity cap enforced by evicting the
//!   least-recently-used entry; zero capacity means unbounded.
//! - **Per-Entry TTL**: Each entry may carry its own time-to-live; expired
//!   entries are misses on read and are reclaimed lazily or by the sweeper.
//! - **Eviction Callbacks**: A per-entry hook invoked exactly once with the
//!   key and value when the entry leaves the cache, whatever the cause.
//! - **Background Sweeper**: An optional thread that samples a random slice
//!   of the cache each tick and purges the expired entries it finds, keeping
//!   per-tick cost bounded on caches of any size.
//! - **Non-Clone Support**: Stores values in an `Arc<V>`, avoiding
//!   `V: Clone` bounds.
//!
//! # Example
//! ```
//! use sweepcache::Cache;
//! use std::time::Duration;
//!
//! let cache = Cache::new(2, Duration::from_millis(50)).unwrap();
//!
//! cache.insert("a", 1);
//! cache.insert_with_ttl("b", 2, Duration::from_secs(30));
//!
//! assert_eq!(cache.get(&"a").as_deref(), Some(&1));
//! assert_eq!(cache.len(), 2);
//!
//! cache.shutdown();
//! ```

// Public modules that form the API
pub mod builder;
pub mod error;
pub mod handle;

// Internal, crate-only modules
mod entry;
mod list;
mod shared;
mod task;
mod time;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use error::BuildError;
pub use handle::Cache;
