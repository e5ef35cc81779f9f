//! Container Operations Module
//!
//! Whole-array transforms: merge, overwrite, flatten, map, range, unshift, pluck.

use tracing::debug;

use crate::value::{Array, Key, Value};

// == Get ==
/// Retrieves a single key, or `default` when the key is missing or null.
pub fn get(array: &Array, key: impl Into<Key>, default: Value) -> Value {
    match array.get(&key.into()) {
        Some(found) if !found.is_null() => found.clone(),
        _ => default,
    }
}

// == Is Array ==
/// Tests if a value can be traversed like an array.
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

// == Is Assoc ==
/// Tests if an array is associative, i.e. its keys are not `0, 1, ..., n-1`.
pub fn is_assoc(array: &Array) -> bool {
    !array.is_list()
}

// == Merge ==
/// Recursively merges arrays from left to right.
///
/// - Integer-keyed values are appended unless an equal value already exists
/// - String-keyed arrays on both sides are merged recursively
/// - Any other string-keyed value is overwritten
pub fn merge<'a>(arrays: impl IntoIterator<Item = &'a Array>) -> Array {
    let mut arrays = arrays.into_iter();
    let mut result = arrays.next().cloned().unwrap_or_default();
    for array in arrays {
        merge_into(&mut result, array);
    }
    result
}

fn merge_into(result: &mut Array, source: &Array) {
    for (key, value) in source.iter() {
        match key {
            Key::Int(_) => {
                if !result.values().any(|existing| existing == value) {
                    result.push(value.clone());
                }
            }
            Key::Str(_) => match (result.get_mut(key), value) {
                (Some(Value::Array(existing)), Value::Array(incoming)) => {
                    merge_into(existing, incoming)
                }
                _ => {
                    result.insert(key.clone(), value.clone());
                }
            },
        }
    }
}

// == Overwrite ==
/// Recursively overwrites the values of `base` with one or more arrays.
///
/// Recurses only where both sides hold an array; keys missing from `base`
/// are added.
pub fn overwrite<'a>(base: Array, arrays: impl IntoIterator<Item = &'a Array>) -> Array {
    let mut base = base;
    for array in arrays {
        overwrite_into(&mut base, array);
    }
    base
}

fn overwrite_into(base: &mut Array, source: &Array) {
    for (key, value) in source.iter() {
        match (base.get_mut(key), value) {
            (Some(Value::Array(existing)), Value::Array(incoming)) => {
                overwrite_into(existing, incoming)
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

// == Flatten ==
/// Flattens nested arrays into a single list of leaf values, depth first.
pub fn flatten(array: &Array) -> Array {
    let mut flat = Array::new();
    flatten_into(array, &mut flat);
    flat
}

fn flatten_into(array: &Array, flat: &mut Array) {
    for value in array.values() {
        match value {
            Value::Array(inner) => flatten_into(inner, flat),
            leaf => flat.push(leaf.clone()),
        }
    }
}

// == Map ==
/// Applies callbacks, in order, to every leaf value including those in
/// sub-arrays.
///
/// When `keys` is given only leaves stored under one of those keys are
/// transformed. Sub-arrays are always traversed.
pub fn map(callbacks: &[&dyn Fn(Value) -> Value], array: Array, keys: Option<&[Key]>) -> Array {
    array
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(inner) => Value::Array(map(callbacks, inner, keys)),
                leaf if keys.map_or(true, |filter| filter.contains(&key)) => {
                    callbacks.iter().fold(leaf, |acc, callback| callback(acc))
                }
                leaf => leaf,
            };
            (key, value)
        })
        .collect()
}

// == Range ==
/// Fills an array with multiples of `step` up to `max`, each keyed by itself.
///
/// Returns an empty array when `step < 1`.
pub fn range(step: i64, max: i64) -> Array {
    let mut array = Array::new();
    if step < 1 {
        debug!(step, "range step below 1, returning empty array");
        return array;
    }

    let mut current = step;
    while current <= max {
        array.insert(Key::Int(current), Value::Int(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    array
}

// == Unshift ==
/// Puts `key` first, followed by the other entries in their original order.
///
/// An existing `key` is moved to the front with the new value.
pub fn unshift(array: Array, key: impl Into<Key>, value: Value) -> Array {
    let key = key.into();
    let mut shifted = Array::new();
    shifted.insert(key.clone(), value);
    for (existing, val) in array {
        if existing != key {
            shifted.insert(existing, val);
        }
    }
    shifted
}

// == Pluck ==
/// Collects the value stored under `key` in each row of a list of arrays.
///
/// Rows that are not arrays, lack the key, or hold null there are skipped.
pub fn pluck(rows: &Array, key: impl Into<Key>) -> Array {
    let key = key.into();
    rows.values()
        .filter_map(Value::as_array)
        .filter_map(|row| row.get(&key))
        .filter(|found| !found.is_null())
        .cloned()
        .collect()
}
