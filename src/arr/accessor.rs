//! Path Accessor Module
//!
//! Reads and writes values inside nested arrays by delimited path.

use tracing::trace;

use crate::config::{Config, DEFAULT_DELIMITER};
use crate::error::Result;
use crate::value::{Array, Key, Value};

/// Path segment that matches every entry at its level.
pub const WILDCARD: &str = "*";

// == Path ==
/// A location inside nested arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    /// A single string split on the delimiter
    Delimited(String),
    /// Key segments that are already split
    Segments(Vec<Key>),
}

impl From<&str> for Path {
    fn from(raw: &str) -> Self {
        Path::Delimited(raw.to_string())
    }
}

impl From<String> for Path {
    fn from(raw: String) -> Self {
        Path::Delimited(raw)
    }
}

impl From<&String> for Path {
    fn from(raw: &String) -> Self {
        Path::Delimited(raw.clone())
    }
}

impl From<i64> for Path {
    fn from(index: i64) -> Self {
        Path::Delimited(index.to_string())
    }
}

impl From<i32> for Path {
    fn from(index: i32) -> Self {
        Path::Delimited(index.to_string())
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Path::Segments(keys)
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Path::Segments(keys.iter().map(|k| Key::normalize(k)).collect())
    }
}

/// Coerces all-digit string segments to integer keys.
fn coerce(key: &Key) -> Key {
    match key {
        Key::Str(raw) => Key::segment(raw),
        Key::Int(_) => key.clone(),
    }
}

fn is_wildcard(key: &Key) -> bool {
    matches!(key, Key::Str(s) if s == WILDCARD)
}

// == Arr ==
/// Path accessor bound to a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arr {
    delimiter: char,
}

impl Default for Arr {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl Arr {
    // == Constructor ==
    /// Creates an accessor that splits path strings on `delimiter`.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Creates an accessor from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.delimiter))
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    // == Path ==
    /// Retrieves a value from nested arrays using a path of keys.
    ///
    /// A string path that is itself a key of `value` matches directly, so keys
    /// containing the delimiter stay reachable. A `*` segment collects the rest
    /// of the path from every entry at its level.
    ///
    /// # Returns
    /// - The value found at `path`
    /// - `default` if `value` is not an array or any segment is missing
    pub fn path(&self, value: &Value, path: impl Into<Path>, default: Value) -> Value {
        let path = path.into();
        match value.as_array().and_then(|array| self.lookup(array, &path)) {
            Some(found) => found,
            None => {
                trace!(?path, "path not found, using default");
                default
            }
        }
    }

    fn lookup(&self, array: &Array, path: &Path) -> Option<Value> {
        match path {
            Path::Segments(keys) => {
                let keys: Vec<Key> = keys.iter().map(coerce).collect();
                self.walk(array, &keys, false)
            }
            Path::Delimited(raw) => {
                // An exact key wins over splitting, even when it holds null
                if let Some(found) = array.get(&Key::normalize(raw)) {
                    return Some(found.clone());
                }
                self.walk(array, &self.split_trimmed(raw), true)
            }
        }
    }

    fn split_trimmed(&self, raw: &str) -> Vec<Key> {
        let delimiter = self.delimiter;
        raw.trim_start_matches(|c: char| c == delimiter || c == ' ')
            .trim_end_matches(|c: char| c == delimiter || c == ' ' || c == '*')
            .split(delimiter)
            .map(Key::segment)
            .collect()
    }

    fn walk(&self, array: &Array, keys: &[Key], delimited: bool) -> Option<Value> {
        let mut cursor = array;
        for (idx, key) in keys.iter().enumerate() {
            let rest = &keys[idx + 1..];
            match cursor.get(key) {
                Some(found) if !found.is_null() => {
                    if rest.is_empty() {
                        return Some(found.clone());
                    }
                    cursor = found.as_array()?;
                }
                _ if is_wildcard(key) => return self.fan_out(cursor, rest, delimited),
                _ => return None,
            }
        }
        None
    }

    /// Resolves the remaining path against every entry of `array`.
    ///
    /// Delimited paths resolve the rest as a delimited string again, so exact
    /// keys containing the delimiter still match. Segment paths keep their
    /// segments. Entries where the path resolves are kept, falsy values
    /// included; null counts as absent.
    fn fan_out(&self, array: &Array, rest: &[Key], delimited: bool) -> Option<Value> {
        let joined = delimited.then(|| {
            Path::Delimited(
                rest.iter()
                    .map(Key::to_string)
                    .collect::<Vec<_>>()
                    .join(&self.delimiter.to_string()),
            )
        });
        let found: Array = array
            .values()
            .filter_map(Value::as_array)
            .filter_map(|entry| match &joined {
                Some(path) => self.lookup(entry, path),
                None => self.walk(entry, rest, false),
            })
            .filter(|value| !value.is_null())
            .collect();

        if found.is_empty() {
            None
        } else {
            Some(Value::Array(found))
        }
    }

    // == Set Path ==
    /// Sets a value in nested arrays by path.
    ///
    /// Missing intermediate keys, and intermediates holding non-array values,
    /// become empty arrays. The final segment is overwritten.
    pub fn set_path(&self, array: &mut Array, path: impl Into<Path>, value: Value) {
        let keys: Vec<Key> = match path.into() {
            Path::Segments(keys) => keys.iter().map(coerce).collect(),
            Path::Delimited(raw) => raw.split(self.delimiter).map(Key::segment).collect(),
        };
        let Some((last, parents)) = keys.split_last() else {
            return;
        };
        trace!(?keys, "setting value by path");

        let mut cursor = array;
        for key in parents {
            cursor = cursor.child_array_mut(key.clone());
        }
        cursor.insert(last.clone(), value);
    }

    // == Extract ==
    /// Retrieves multiple paths into a fresh array laid out by the same paths.
    ///
    /// Missing paths are filled with `default`.
    pub fn extract<P: Into<Path>>(
        &self,
        array: &Array,
        paths: impl IntoIterator<Item = P>,
        default: Value,
    ) -> Array {
        let mut found = Array::new();
        for path in paths {
            let path = path.into();
            let value = self
                .lookup(array, &path)
                .unwrap_or_else(|| default.clone());
            self.set_path(&mut found, path, value);
        }
        found
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn array(json: serde_json::Value) -> Array {
        match Value::from(json) {
            Value::Array(array) => array,
            other => panic!("expected array fixture, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_path_non_array_returns_default() {
        let arr = Arr::default();
        assert_eq!(
            arr.path(&Value::from("not-an-array"), "any.path", Value::from("default")),
            Value::from("default")
        );
        assert_eq!(arr.path(&Value::Null, "any.path", Value::from(123)), Value::from(123));
        assert_eq!(
            arr.path(&Value::from(3.14), "some.path", Value::Array(Array::new())),
            Value::Array(Array::new())
        );
    }

    #[test]
    fn test_path_simple_and_nested() {
        let arr = Arr::default();
        let data = value(json!({"person": {"name": "John", "age": 30}, "a": 1}));

        assert_eq!(arr.path(&data, "a", Value::Null), Value::from(1));
        assert_eq!(arr.path(&data, "person.name", Value::Null), Value::from("John"));
        assert_eq!(arr.path(&data, "person.age", Value::Null), Value::from(30));
        assert_eq!(arr.path(&data, "person.city", Value::from("NY")), Value::from("NY"));
    }

    #[test]
    fn test_path_numeric_keys() {
        let arr = Arr::default();
        let data = value(json!([10, 20, 30]));

        assert_eq!(arr.path(&data, 1i64, Value::Null), Value::from(20));
        assert_eq!(arr.path(&data, "2", Value::Null), Value::from(30));
        assert_eq!(arr.path(&data, "02", Value::Null), Value::from(30));
    }

    #[test]
    fn test_path_segments() {
        let arr = Arr::default();
        let data = value(json!({"person": {"name": "John", "age": 30}}));

        assert_eq!(arr.path(&data, ["person", "age"], Value::Null), Value::from(30));
    }

    #[test]
    fn test_path_direct_key_with_delimiter() {
        let arr = Arr::default();
        let data = value(json!({"a.b": "literal", "a": {"b": "nested"}}));

        assert_eq!(arr.path(&data, "a.b", Value::Null), Value::from("literal"));
    }

    #[test]
    fn test_path_trims_delimiters_and_wildcard_tail() {
        let arr = Arr::default();
        let data = value(json!({"a": {"b": 1}}));

        assert_eq!(arr.path(&data, ". a.b .", Value::Null), Value::from(1));
        assert_eq!(arr.path(&data, "a.*", Value::Null), value(json!({"b": 1})));
    }

    #[test]
    fn test_path_stops_at_scalar() {
        let arr = Arr::default();
        let data = value(json!({"a": "scalar"}));

        assert_eq!(arr.path(&data, "a.b", Value::from("missing")), Value::from("missing"));
    }

    #[test]
    fn test_path_wildcard() {
        let arr = Arr::default();
        let data = value(json!([
            {"name": "John", "age": 30},
            {"age": 40},
            {"name": "Jane", "age": 25}
        ]));

        assert_eq!(
            arr.path(&data, "*.name", Value::Array(Array::new())),
            value(json!(["John", "Jane"]))
        );
        assert_eq!(
            arr.path(&data, "*.city", Value::from("not-found")),
            Value::from("not-found")
        );
    }

    #[test]
    fn test_path_wildcard_keeps_falsy_values() {
        let arr = Arr::default();
        let data = value(json!([{"n": 0}, {"n": ""}, {"n": false}, {"n": null}]));

        assert_eq!(arr.path(&data, "*.n", Value::Null), value(json!([0, "", false])));
    }

    #[test]
    fn test_path_nested_wildcards() {
        let arr = Arr::default();
        let data = value(json!({
            "teams": [
                {"members": [{"name": "a"}, {"name": "b"}]},
                {"members": [{"name": "c"}]}
            ]
        }));

        assert_eq!(
            arr.path(&data, "teams.*.members.*.name", Value::Null),
            value(json!([["a", "b"], ["c"]]))
        );
    }

    #[test]
    fn test_path_null_value_is_absent() {
        let arr = Arr::default();
        let data = value(json!({"a": {"b": null}, "c": null}));

        assert_eq!(arr.path(&data, "a.b", Value::from("d")), Value::from("d"));
        assert_eq!(arr.path(&data, ["c"], Value::from("d")), Value::from("d"));
        // An exact key is returned as stored
        assert_eq!(arr.path(&data, "c", Value::from("d")), Value::Null);
    }

    #[test]
    fn test_path_exact_key_holding_null_wins() {
        let arr = Arr::default();
        let data = value(json!({"a.b": null, "a": {"b": "nested"}}));

        assert_eq!(arr.path(&data, "a.b", Value::from("default")), Value::Null);
        assert_eq!(arr.path(&data, ["a", "b"], Value::Null), Value::from("nested"));
    }

    #[test]
    fn test_path_segments_after_wildcard_keep_delimiter() {
        let arr = Arr::default();
        let data = value(json!([
            {"a.b": 1, "a": {"b": 2}},
            {"a": {"b": 3}}
        ]));

        let segments = vec![Key::from("*"), Key::from("a.b")];
        assert_eq!(arr.path(&data, segments, Value::Null), value(json!([1])));
        assert_eq!(arr.path(&data, "*.a.b", Value::Null), value(json!([1, 3])));
    }

    #[test]
    fn test_set_path_leading_zero_segment_roundtrip() {
        let arr = Arr::default();
        let mut data = Array::new();

        arr.set_path(&mut data, "a.007", Value::from("v"));
        arr.set_path(&mut data, "b.007.c", Value::from("w"));

        let data = Value::Array(data);
        assert_eq!(arr.path(&data, "a.007", Value::from("default")), Value::from("v"));
        assert_eq!(arr.path(&data, "a.7", Value::from("default")), Value::from("v"));
        assert_eq!(arr.path(&data, "b.007.c", Value::from("default")), Value::from("w"));
    }

    #[test]
    fn test_path_custom_delimiter() {
        let arr = Arr::new('/');
        let data = value(json!({"a": {"b": "found"}}));

        assert_eq!(arr.path(&data, "a/b", Value::Null), Value::from("found"));
        assert_eq!(arr.path(&data, "a.b", Value::Null), Value::Null);
    }

    #[test]
    fn test_set_path_creates_nested() {
        let arr = Arr::default();
        let mut data = Array::new();

        arr.set_path(&mut data, "ko7.is", Value::from("awesome"));

        assert_eq!(data, array(json!({"ko7": {"is": "awesome"}})));
    }

    #[test]
    fn test_set_path_modifies_existing() {
        let arr = Arr::default();
        let mut data = array(json!({"ko7": {"is": "cool"}}));

        arr.set_path(&mut data, "ko7.and", Value::from("slow"));

        assert_eq!(data, array(json!({"ko7": {"is": "cool", "and": "slow"}})));
    }

    #[test]
    fn test_set_path_indexed_and_numeric() {
        let arr = Arr::default();
        let mut data = array(json!({"foo": ["test"]}));
        arr.set_path(&mut data, "foo.0", Value::from("bar"));
        assert_eq!(data, array(json!({"foo": ["bar"]})));

        let mut users = array(json!({"users": []}));
        arr.set_path(&mut users, "users.0.name", Value::from("John"));
        assert_eq!(
            users.get(&Key::from("users")).and_then(Value::as_array).unwrap().get(&Key::Int(0)),
            Some(&value(json!({"name": "John"})))
        );
    }

    #[test]
    fn test_set_path_custom_delimiter_and_segments() {
        let mut slashed = Array::new();
        Arr::new('/').set_path(&mut slashed, "ko7/is", Value::from("awesome"));

        let mut segmented = Array::new();
        Arr::default().set_path(&mut segmented, ["ko7", "is"], Value::from("awesome"));

        assert_eq!(slashed, array(json!({"ko7": {"is": "awesome"}})));
        assert_eq!(slashed, segmented);
    }

    #[test]
    fn test_set_path_overwrites_sub_array() {
        let arr = Arr::default();
        let mut data = array(json!({"ko7": {"is": "awesome"}}));

        arr.set_path(&mut data, "ko7", Value::from("not an array anymore"));

        assert_eq!(data, array(json!({"ko7": "not an array anymore"})));
    }

    #[test]
    fn test_extract_complex_paths() {
        let arr = Arr::default();
        let data = array(json!({
            "user": {
                "profile": {"personal": {"name": "John", "age": 30}},
                "settings": {"theme": "dark"}
            },
            "system": {"version": "1.0"}
        }));

        let result = arr.extract(
            &data,
            [
                "user.profile.personal.name",
                "user.settings.theme",
                "user.profile.personal.email",
                "nonexistent.deep.path",
            ],
            Value::from("N/A"),
        );

        assert_eq!(
            result,
            array(json!({
                "user": {
                    "profile": {"personal": {"name": "John", "email": "N/A"}},
                    "settings": {"theme": "dark"}
                },
                "nonexistent": {"deep": {"path": "N/A"}}
            }))
        );
    }

    #[test]
    fn test_extract_numeric_indices() {
        let arr = Arr::default();
        let data = array(json!({"users": [{"name": "John"}, {"name": "Jane"}, {"name": "Bob"}]}));

        let result = arr.extract(
            &data,
            ["users.0.name", "users.1.name", "users.5.name"],
            Value::from("Unknown"),
        );

        let users = result.get(&Key::from("users")).and_then(Value::as_array).unwrap();
        let keys: Vec<_> = users.keys().cloned().collect();
        assert_eq!(keys, vec![Key::Int(0), Key::Int(1), Key::Int(5)]);
        assert_eq!(users.get(&Key::Int(5)), Some(&value(json!({"name": "Unknown"}))));
    }

    #[test]
    fn test_extract_empty_inputs() {
        let arr = Arr::default();

        let result = arr.extract(&Array::new(), ["key1", "key2"], Value::from("default"));
        assert_eq!(result, array(json!({"key1": "default", "key2": "default"})));

        let result = arr.extract(&array(json!({"a": 1})), Vec::<&str>::new(), Value::Null);
        assert!(result.is_empty());
    }

    #[test]
    fn test_from_config_rejects_wildcard_delimiter() {
        let config = Config {
            delimiter: '*',
            ..Config::default()
        };
        assert!(Arr::from_config(&config).is_err());
        assert_eq!(Arr::from_config(&Config::default()).unwrap().delimiter(), '.');
    }
}
