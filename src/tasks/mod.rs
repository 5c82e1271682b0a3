//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Expiration sweep: drains elapsed epochs at the cache's eviction interval

mod sweeper;

pub use sweeper::{lock_store, spawn_sweeper, SharedStore, SweeperHandle};
