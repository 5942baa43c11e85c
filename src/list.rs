use crate::entry::CacheEntry;

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use generational_arena::{Arena, Index};

#[derive(Debug)]
pub(crate) struct Node<K, V> {
  pub(crate) key: K,
  pub(crate) entry: CacheEntry<K, V>,
  next: Option<Index>,
  prev: Option<Index>,
}

/// The recency-ordered store behind the engine lock: an arena of nodes
/// linked through stable handles, plus a key index. The head is the
/// most-recently-used entry, the tail the least-recently-used.
#[derive(Debug)]
pub(crate) struct LruList<K, V, H> {
  // Arena keeps node handles valid across removals of other nodes.
  nodes: Arena<Node<K, V>>,
  // O(1) lookup of a key to its node handle in the arena.
  lookup: HashMap<K, Index, H>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<K, V, H> LruList<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub(crate) fn with_hasher(hasher: H) -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::with_hasher(hasher),
      head: None,
      tail: None,
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.lookup.len()
  }

  pub(crate) fn index_of(&self, key: &K) -> Option<Index> {
    self.lookup.get(key).copied()
  }

  pub(crate) fn node(&self, index: Index) -> &Node<K, V> {
    &self.nodes[index]
  }

  pub(crate) fn node_mut(&mut self, index: Index) -> &mut Node<K, V> {
    &mut self.nodes[index]
  }

  pub(crate) fn tail_index(&self) -> Option<Index> {
    self.tail
  }

  // Helper to detach a node from the chain without touching the arena or
  // the key index.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev = node.prev;
    let next = node.next;

    if let Some(prev_index) = prev {
      self.nodes[prev_index].next = next;
    } else {
      // The node was the head.
      self.head = next;
    }

    if let Some(next_index) = next {
      self.nodes[next_index].prev = prev;
    } else {
      // The node was the tail.
      self.tail = prev;
    }
  }

  // Helper to link an already-detached node in as the new head.
  fn link_front(&mut self, index: Index) {
    let old_head = self.head;
    self.nodes[index].prev = None;
    self.nodes[index].next = old_head;
    self.head = Some(index);

    if let Some(old_head_index) = old_head {
      self.nodes[old_head_index].prev = Some(index);
    }

    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  /// Inserts a fresh entry at the head. The caller has already established
  /// that `key` is not present.
  pub(crate) fn push_front(&mut self, key: K, entry: CacheEntry<K, V>) {
    let index = self.nodes.insert(Node {
      key: key.clone(),
      entry,
      next: None,
      prev: None,
    });
    self.lookup.insert(key, index);
    self.link_front(index);
  }

  /// Moves an existing node to the head, marking it most-recently-used.
  pub(crate) fn move_to_front(&mut self, index: Index) {
    if self.head != Some(index) {
      self.unlink(index);
      self.link_front(index);
    }
  }

  /// Detaches a node from both the chain and the key index, returning it
  /// whole so the caller can deliver the entry to its callback.
  pub(crate) fn remove(&mut self, index: Index) -> Node<K, V> {
    self.unlink(index);
    let node = self.nodes.remove(index).unwrap();
    self.lookup.remove(&node.key);
    node
  }

  /// Handles of the entries among the first `budget`, in key-index order,
  /// that are expired at `now`.
  pub(crate) fn expired_handles(&self, budget: usize, now: u64) -> Vec<Index> {
    self
      .lookup
      .values()
      .take(budget)
      .copied()
      .filter(|&index| self.nodes[index].entry.is_expired(now))
      .collect()
  }

  /// Drops every node and index entry wholesale, without yielding them.
  pub(crate) fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  // A helper for tests, to get the order of keys from head to tail.
  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<K> {
    let mut keys = Vec::new();
    let mut current = self.head;
    while let Some(index) = current {
      keys.push(self.nodes[index].key.clone());
      current = self.nodes[index].next;
    }
    keys
  }
}
