//! Single-value cache slot with load coalescing.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{Cached, Origin};

/// Holds at most one cached value.
///
/// The lock is held across the loader, so concurrent first readers wait for
/// the one in-flight load instead of issuing their own.
pub struct CacheSlot<T> {
  inner: Mutex<Option<Cached<T>>>,
}

impl<T> CacheSlot<T> {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(None),
    }
  }

  /// Return the cached value, or run `load` and cache what it produces.
  ///
  /// The loader cannot fail: callers resolve errors (e.g. by substituting
  /// fallback data) before handing a value back.
  pub async fn get_or_load<F, Fut>(&self, load: F) -> Cached<T>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = (Arc<T>, Origin)>,
  {
    let mut slot = self.inner.lock().await;
    if let Some(cached) = slot.as_ref() {
      return cached.clone();
    }

    let (data, origin) = load().await;
    let cached = Cached::new(data, origin);
    *slot = Some(cached.clone());
    cached
  }

  /// Non-blocking peek for render paths. `None` while empty or while a load
  /// holds the slot.
  pub fn try_peek(&self) -> Option<Cached<T>> {
    self.inner.try_lock().ok().and_then(|slot| slot.clone())
  }

  /// Drop the cached value. Returns whether anything was cached.
  pub async fn invalidate(&self) -> bool {
    self.inner.lock().await.take().is_some()
  }
}

impl<T> Default for CacheSlot<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  #[tokio::test]
  async fn test_loads_once() {
    let slot = CacheSlot::new();
    let loads = AtomicU32::new(0);

    let first = slot
      .get_or_load(|| async {
        loads.fetch_add(1, Ordering::SeqCst);
        (Arc::new(vec![1, 2, 3]), Origin::Remote)
      })
      .await;
    let second = slot
      .get_or_load(|| async {
        loads.fetch_add(1, Ordering::SeqCst);
        (Arc::new(vec![9]), Origin::Fallback)
      })
      .await;

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first.data, &second.data));
    assert_eq!(second.origin, Origin::Remote);
  }

  #[tokio::test]
  async fn test_invalidate_forces_reload() {
    let slot = CacheSlot::new();
    slot
      .get_or_load(|| async { (Arc::new("old"), Origin::Fallback) })
      .await;

    assert!(slot.invalidate().await);
    assert!(!slot.invalidate().await);
    assert!(slot.try_peek().is_none());

    let reloaded = slot
      .get_or_load(|| async { (Arc::new("new"), Origin::Remote) })
      .await;
    assert_eq!(*reloaded.data, "new");
  }

  #[tokio::test]
  async fn test_concurrent_readers_share_one_load() {
    let slot = Arc::new(CacheSlot::new());
    let loads = Arc::new(AtomicU32::new(0));

    let readers = (0..8).map(|_| {
      let slot = Arc::clone(&slot);
      let loads = Arc::clone(&loads);
      tokio::spawn(async move {
        slot
          .get_or_load(|| async {
            loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            (Arc::new(42u32), Origin::Remote)
          })
          .await
      })
    });

    for reader in futures::future::join_all(readers).await {
      assert_eq!(*reader.unwrap().data, 42);
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_try_peek() {
    let slot = CacheSlot::new();
    assert!(slot.try_peek().is_none());

    slot
      .get_or_load(|| async { (Arc::new(1u8), Origin::Fallback) })
      .await;
    assert_eq!(slot.try_peek().map(|c| c.origin), Some(Origin::Fallback));
  }
}
