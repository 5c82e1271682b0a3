//! API Module
//!
//! The call surface handed to embedding code.
//!
//! # Operations
//! - `get` - Read a value, promoting it to most recently used
//! - `set` - Write a value with an optional TTL
//! - `remove` - Delete a key
//! - `clear` - Drop everything
//! - `dispose` - Stop the background sweeper and release the cache

pub mod handle;

pub use handle::{create_cache, Cache};
