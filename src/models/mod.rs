//! Option models for the cache
//!
//! Construction-time and per-call options. Both deserialize with serde so a
//! host can forward them straight from its own configuration or JSON payloads.

pub mod options;

// Re-export commonly used types
pub use options::{CacheOptions, SetOptions};
