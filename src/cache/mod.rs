//! Cache Module
//!
//! Provides in-memory caching with LRU eviction and epoch-bucketed TTL
//! expiration.

mod clock;
mod entry;
mod expiry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use expiry::{ExpirationScheduler, EPOCH_WRAP};
pub use lru::UsageOrder;
pub use stats::CacheStats;
pub use store::CacheStore;
