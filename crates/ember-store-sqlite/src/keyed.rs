//! Per-key async locks.
//!
//! Operations touching a single user's quota row or a single pair's match
//! state serialize behind the lock for that key, while unrelated keys
//! proceed concurrently. The map only ever holds a small mutex per key, so
//! entries are kept for the lifetime of the store.

use std::{
  collections::HashMap,
  hash::Hash,
  sync::{Arc, Mutex},
};

use tokio::sync::OwnedMutexGuard;

pub struct KeyedLocks<K> {
  inner: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(HashMap::new()),
    }
  }

  /// Acquire the lock for `key`, waiting if another task holds it.
  pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
    let mutex = {
      let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
      Arc::clone(map.entry(key).or_default())
    };
    mutex.lock_owned().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn same_key_serializes_distinct_keys_do_not() {
    let locks = Arc::new(KeyedLocks::new());

    let a = locks.lock("a").await;
    // A different key is immediately available.
    let _b = locks.lock("b").await;

    let locks2 = Arc::clone(&locks);
    let handle = tokio::spawn(async move {
      let _a = locks2.lock("a").await;
    });

    // The spawned task cannot finish until the guard drops.
    tokio::task::yield_now().await;
    assert!(!handle.is_finished());

    drop(a);
    handle.await.unwrap();
  }
}
