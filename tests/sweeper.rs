use sweepcache::{Cache, CacheBuilder};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const SWEEP_TICK: Duration = Duration::from_millis(10);
const TINY_TTL: Duration = Duration::from_millis(50);
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

// The sweep samples a random slice per pass, so an expired entry may
// survive several ticks. Tests poll with a generous deadline instead of
// assuming any single pass reclaims everything.
const POLL_DEADLINE: Duration = Duration::from_secs(5);
const POLL_SLEEP: Duration = Duration::from_millis(20);

fn poll_until_empty(cache: &Cache<i32, i32>) {
  let deadline = Instant::now() + POLL_DEADLINE;
  while cache.len() > 0 && Instant::now() < deadline {
    thread::sleep(POLL_SLEEP);
  }
}

#[test]
fn test_sweeper_reclaims_expired_entries_without_reads() {
  let cache: Cache<i32, i32> = Cache::new(0, SWEEP_TICK).unwrap();

  for i in 0..10 {
    cache.insert_with_ttl(i, i, TINY_TTL);
  }
  assert_eq!(cache.len(), 10);

  // `len` never checks expirations, so only the sweeper can drain this.
  poll_until_empty(&cache);
  assert_eq!(
    cache.len(),
    0,
    "The sweeper should have reclaimed every expired entry"
  );
}

#[test]
fn test_sweeper_fires_each_callback_exactly_once() {
  let (tx, rx) = mpsc::channel();
  let cache: Cache<&str, i32> = CacheBuilder::new()
    .sweep_interval(SWEEP_TICK)
    .build()
    .unwrap();

  for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
    let tx = tx.clone();
    cache.insert_with_ttl_and_callback(key, value, TINY_TTL, move |key, value| {
      tx.send((key, *value)).unwrap();
    });
  }

  let mut reclaimed = vec![
    rx.recv_timeout(RECV_TIMEOUT).unwrap(),
    rx.recv_timeout(RECV_TIMEOUT).unwrap(),
    rx.recv_timeout(RECV_TIMEOUT).unwrap(),
  ];
  reclaimed.sort();
  assert_eq!(reclaimed, vec![("a", 1), ("b", 2), ("c", 3)]);

  // Three entries expired; nothing else may ever arrive.
  thread::sleep(SWEEP_TICK * 4);
  assert!(rx.try_recv().is_err());
}

#[test]
fn test_manual_sweep_removes_only_expired_entries() {
  let cache = CacheBuilder::<i32, i32>::new().build().unwrap();

  for i in 0..5 {
    cache.insert(i, i);
  }
  for i in 5..10 {
    cache.insert_with_ttl(i, i, Duration::from_nanos(1));
  }
  thread::sleep(Duration::from_millis(5));

  // Each pass examines a random prefix of the key index, so repeat until
  // all five expired entries have been found.
  let mut removed_total = 0;
  for _ in 0..1000 {
    removed_total += cache.sweep_expired();
    if removed_total == 5 {
      break;
    }
  }

  assert_eq!(removed_total, 5, "Exactly the expired entries are removed");
  assert_eq!(cache.len(), 5);
  for i in 0..5 {
    assert!(
      cache.get(&i).is_some(),
      "Live entry {} must survive sweeping",
      i
    );
  }
}

#[test]
fn test_sweep_of_an_empty_cache_is_a_noop() {
  let cache = CacheBuilder::<i32, i32>::new().build().unwrap();
  assert_eq!(cache.sweep_expired(), 0);
}

#[test]
fn test_sweep_without_expired_entries_removes_nothing() {
  let cache = CacheBuilder::<i32, i32>::new().build().unwrap();

  for i in 0..8 {
    cache.insert(i, i);
  }
  for _ in 0..50 {
    assert_eq!(cache.sweep_expired(), 0);
  }
  assert_eq!(cache.len(), 8);
}

#[test]
fn test_clear_does_not_stop_the_sweeper() {
  let cache: Cache<i32, i32> = Cache::new(0, SWEEP_TICK).unwrap();

  cache.insert_with_ttl(1, 1, Duration::from_secs(60));
  cache.clear();
  assert_eq!(cache.len(), 0);

  // The sweeper must still be running and reclaim this second batch.
  for i in 0..5 {
    cache.insert_with_ttl(i, i, TINY_TTL);
  }
  poll_until_empty(&cache);
  assert_eq!(cache.len(), 0, "The sweeper should survive a clear");
}
