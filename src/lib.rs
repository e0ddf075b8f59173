//! cachebound: a memory-bounded, thread-safe LRU object cache.
//!
//! The crate provides a single eviction policy: strict least-recently-used,
//! bounded by entry count, with hit-rate accounting and predicate-based bulk
//! removal. See [`policy::lru`] for the single-threaded core and the
//! concurrent wrapper.

pub mod error;
pub mod policy;
pub mod prelude;
pub mod stats;
pub mod traits;
