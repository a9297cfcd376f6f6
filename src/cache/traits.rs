//! Core types for the caching system.

use std::sync::Arc;

/// Where a cached value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  /// Loaded from the remote API
  Remote,
  /// API unreachable, built-in fallback data
  Fallback,
}

impl Origin {
  pub fn is_fallback(&self) -> bool {
    matches!(self, Origin::Fallback)
  }
}

/// A cached value with metadata about its source.
///
/// Cloning is cheap: every clone shares the same allocation.
#[derive(Debug)]
pub struct Cached<T> {
  pub data: Arc<T>,
  pub origin: Origin,
}

impl<T> Cached<T> {
  pub fn new(data: Arc<T>, origin: Origin) -> Self {
    Self { data, origin }
  }
}

// Manual impl: derive would require T: Clone.
impl<T> Clone for Cached<T> {
  fn clone(&self) -> Self {
    Self {
      data: Arc::clone(&self.data),
      origin: self.origin,
    }
  }
}
