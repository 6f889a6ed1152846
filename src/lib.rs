//! evictkit: fixed-capacity LRU and LFU cache engines.
//!
//! Both engines are built on an arena-backed intrusive list ([`ds`]). The LFU
//! engine nests one list per frequency tier inside an outer list of tiers, so
//! promotion on every read is O(1) without heaps or re-sorting.
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`policy`]      | `LruCache`, `LfuCache`                                |
//! | [`traits`]      | `CacheEngine`, `StatsSource`                          |
//! | [`metrics`]     | Delta and cumulative statistics                       |
//! | [`hooks`]       | Optional hit/miss/evict/fill-level callbacks          |
//! | [`builder`]     | `CacheBuilder`, runtime policy selection              |
//! | `concurrent`    | Locking wrappers (feature `concurrency`)              |
//! | `reporter`      | Periodic stats thread (feature `concurrency`)         |
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get(&"a");
//! cache.set("c", 3);
//! assert!(!cache.contains(&"b"));
//! ```

pub mod builder;
pub mod config;
pub mod ds;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;

#[cfg(feature = "concurrency")]
pub mod concurrent;
#[cfg(feature = "concurrency")]
pub mod reporter;
