//! arrkit - Nested array helpers and cache items
//!
//! Provides path-based access to nested arrays with wildcard traversal,
//! recursive merge/overwrite/flatten helpers, and a PSR-6 style cache item.

pub mod arr;
pub mod cache;
pub mod config;
pub mod error;
pub mod value;

pub use arr::{Arr, Path};
pub use cache::{CacheItem, Item, Lifetime};
pub use config::Config;
pub use error::{Error, Result};
pub use value::{Array, Key, Value};
