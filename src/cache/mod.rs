//! Cache Module
//!
//! Provides the cache item handed between a cache pool and its callers.

mod item;

// Re-export public types
pub use item::{sanitize_key, CacheItem, Item, Lifetime};
