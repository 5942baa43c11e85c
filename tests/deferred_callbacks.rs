use sweepcache::CacheBuilder;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const TINY_TTL: Duration = Duration::from_millis(100);
const SLEEP_MARGIN: Duration = Duration::from_millis(100);
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

#[test]
fn test_deferred_callback_runs_off_thread() {
  let (tx, rx) = mpsc::channel();
  let cache = CacheBuilder::<&str, i32>::new()
    .deferred_callbacks()
    .build()
    .unwrap();

  cache.insert_with_ttl_and_callback("a", 1, Duration::ZERO, move |key, value| {
    tx.send((key, *value, thread::current().id())).unwrap();
  });
  cache.remove(&"a");

  let (key, value, callback_thread) = rx.recv_timeout(RECV_TIMEOUT).unwrap();
  assert_eq!((key, value), ("a", 1));
  assert_ne!(
    callback_thread,
    thread::current().id(),
    "Deferred delivery must run on the notifier thread"
  );
}

#[test]
fn test_deferred_delivery_is_exactly_once_per_removal() {
  let (tx, rx) = mpsc::channel();
  let cache = CacheBuilder::<&str, i32>::new()
    .capacity(2)
    .deferred_callbacks()
    .build()
    .unwrap();

  for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
    let tx = tx.clone();
    cache.insert_with_ttl_and_callback(key, value, Duration::ZERO, move |key, value| {
      tx.send((key, *value)).unwrap();
    });
  }

  // Capacity 2: inserting "c" evicted "a", inserting "d" evicted "b".
  let mut evicted = vec![
    rx.recv_timeout(RECV_TIMEOUT).unwrap(),
    rx.recv_timeout(RECV_TIMEOUT).unwrap(),
  ];
  evicted.sort();
  assert_eq!(evicted, vec![("a", 1), ("b", 2)]);
  assert!(rx.try_recv().is_err(), "Only two removals ever happened");

  assert_eq!(cache.get(&"c").as_deref(), Some(&3));
  assert_eq!(cache.get(&"d").as_deref(), Some(&4));
}

#[test]
fn test_deferred_callback_may_reenter_the_cache() {
  let (done_tx, done_rx) = mpsc::channel();
  let cache = CacheBuilder::<&str, i32>::new()
    .deferred_callbacks()
    .build()
    .unwrap();

  // The callback holds its own handle and inserts through it; off the
  // engine lock this cannot deadlock.
  let reentrant = cache.clone();
  cache.insert_with_ttl_and_callback("a", 1, Duration::ZERO, move |_, _| {
    reentrant.insert("reborn", 99);
    done_tx.send(()).unwrap();
  });
  cache.remove(&"a");

  done_rx.recv_timeout(RECV_TIMEOUT).unwrap();
  assert_eq!(cache.get(&"reborn").as_deref(), Some(&99));
}

#[test]
fn test_expired_read_misses_even_when_the_callback_reinserts() {
  let (done_tx, done_rx) = mpsc::channel();
  let cache = CacheBuilder::<&str, i32>::new()
    .deferred_callbacks()
    .build()
    .unwrap();

  let reentrant = cache.clone();
  cache.insert_with_ttl_and_callback("a", 1, TINY_TTL, move |key, _| {
    reentrant.insert(key, 2);
    done_tx.send(()).unwrap();
  });

  thread::sleep(TINY_TTL + SLEEP_MARGIN);
  assert!(
    cache.get(&"a").is_none(),
    "An expired read is a miss; the reinsert lands after the lookup"
  );

  done_rx.recv_timeout(RECV_TIMEOUT).unwrap();
  assert_eq!(cache.get(&"a").as_deref(), Some(&2));
}
