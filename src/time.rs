use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

// The single reference point for all expiration arithmetic, fixed on first
// use so timestamps fit in a u64 of nanoseconds.
static CACHE_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Current time as whole nanoseconds since the cache epoch.
#[inline]
pub(crate) fn now_nanos() -> u64 {
  Instant::now().saturating_duration_since(*CACHE_EPOCH).as_nanos() as u64
}

/// Absolute expiration timestamp for a TTL starting now. A zero `ttl`
/// yields 0, the "never expires" sentinel.
#[inline]
pub(crate) fn expiry_nanos(ttl: Duration) -> u64 {
  if ttl.is_zero() {
    0
  } else {
    now_nanos() + ttl.as_nanos() as u64
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn now_is_monotonic_from_epoch() {
    let a = now_nanos();
    let b = now_nanos();
    assert!(b >= a);
  }

  #[test]
  fn zero_ttl_maps_to_sentinel() {
    assert_eq!(expiry_nanos(Duration::ZERO), 0);
  }

  #[test]
  fn nonzero_ttl_lands_in_the_future() {
    let expiry = expiry_nanos(Duration::from_secs(60));
    assert!(expiry > now_nanos());
  }
}
