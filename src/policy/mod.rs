//! Eviction policies.
//!
//! Only LRU is implemented; the module level exists so additional policies
//! slot in beside it without reshuffling the public paths.

pub mod lru;
