//! Arr Module
//!
//! Helpers for reading and transforming nested arrays.
//!
//! Path helpers live on [`Arr`], which carries the delimiter. The free
//! functions below use the default `.` delimiter.

mod accessor;
mod callback;
mod ops;


// Re-export public types
pub use accessor::{Arr, Path, WILDCARD};
pub use callback::{callback, Callback, Command};
pub use ops::{flatten, get, is_array, is_assoc, map, merge, overwrite, pluck, range, unshift};

use crate::value::{Array, Value};

/// Retrieves a value by `.`-delimited path. See [`Arr::path`].
pub fn path(value: &Value, path: impl Into<Path>, default: Value) -> Value {
    Arr::default().path(value, path, default)
}

/// Sets a value by `.`-delimited path. See [`Arr::set_path`].
pub fn set_path(array: &mut Array, path: impl Into<Path>, value: Value) {
    Arr::default().set_path(array, path, value)
}

/// Retrieves multiple `.`-delimited paths. See [`Arr::extract`].
pub fn extract<P: Into<Path>>(
    array: &Array,
    paths: impl IntoIterator<Item = P>,
    default: Value,
) -> Array {
    Arr::default().extract(array, paths, default)
}
