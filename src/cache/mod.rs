//! In-memory caching for repository reads.
//!
//! A [`CacheSlot`] holds one value for the lifetime of its owner:
//! - populated at most once, by whichever caller gets the slot first
//! - never expires on its own, only on explicit invalidation
//! - remembers whether the value came from the network or the built-in fallback

mod slot;
mod traits;

pub use slot::CacheSlot;
pub use traits::{Cached, Origin};
