pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::config::CacheConfig;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::hooks::CacheHooks;
pub use crate::metrics::CacheStats;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CacheEngine, StatsSource};

#[cfg(feature = "concurrency")]
pub use crate::concurrent::{AutoLockCache, CacheGuard, SharedCache};
#[cfg(feature = "concurrency")]
pub use crate::reporter::StatsReporter;
