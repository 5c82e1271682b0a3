//! Epoch Cache - An embeddable in-process key-value cache
//!
//! Bounds capacity with least-recently-used eviction and expires entries by
//! time-to-live using epoch buckets swept on a fixed cadence, rather than a
//! timer per entry.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::{create_cache, Cache};
pub use cache::{CacheStats, CacheStore, Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use models::{CacheOptions, SetOptions};
