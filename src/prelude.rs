pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lru::LruCore;
pub use crate::stats::StatsSnapshot;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[cfg(feature = "concurrency")]
pub use crate::policy::lru::ConcurrentLruCache;
