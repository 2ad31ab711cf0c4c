//! Subscripting: `value[index]`.
//!
//! Arrays, ranges and strings take numeric indices (negative ones count from
//! the end) or a range/array of indices, which gathers the selected elements.
//! Maps take string keys, or an array of keys to select a sub-map.

use crate::{ElError, ElResult, Value, ValueKind};
use std::collections::BTreeMap;

/// Resolved positions into an ordered value.
enum Selection {
    Single(usize),
    Many(Vec<usize>),
}

/// Resolve a possibly negative index against a length.
fn resolve_index(raw: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if raw < 0 { raw + len } else { raw };
    (0..len).contains(&index).then_some(index as usize)
}

impl Value {
    /// Index this value.
    pub fn index(&self, index: &Value) -> ElResult<Value> {
        match self.kind() {
            ValueKind::Array(items) => Ok(match self.select(index, items.len())? {
                Selection::Single(i) => items[i].clone(),
                Selection::Many(indices) => {
                    Value::from(indices.into_iter().map(|i| items[i].clone()).collect::<Vec<_>>())
                }
            }),
            ValueKind::Range(values) => Ok(match self.select(index, values.len())? {
                Selection::Single(i) => Value::from(values[i]),
                Selection::Many(indices) => {
                    Value::range(indices.into_iter().map(|i| values[i]).collect())
                }
            }),
            ValueKind::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                Ok(match self.select(index, chars.len())? {
                    Selection::Single(i) => Value::from(chars[i].to_string()),
                    Selection::Many(indices) => {
                        Value::from(indices.into_iter().map(|i| chars[i]).collect::<String>())
                    }
                })
            }
            ValueKind::Map(map) => match index.kind() {
                ValueKind::String(key) => map
                    .get(key)
                    .cloned()
                    .ok_or_else(|| ElError::index(self.describe(), index.describe())),
                ValueKind::Array(keys) => {
                    let mut selected = BTreeMap::new();
                    for key in keys {
                        let found = key.as_str().ok().and_then(|k| map.get_key_value(k));
                        let (k, v) = found
                            .ok_or_else(|| ElError::index(self.describe(), key.describe()))?;
                        selected.insert(k.clone(), v.clone());
                    }
                    Ok(Value::new(ValueKind::Map(selected)))
                }
                _ => Err(ElError::index(self.describe(), index.describe())),
            },
            _ => Err(ElError::index(self.describe(), index.describe())),
        }
    }

    /// `self[index]` for an integer index.
    pub fn at(&self, index: i64) -> ElResult<Value> {
        self.index(&Value::from(index))
    }

    /// `self[key]` for a string key.
    pub fn get(&self, key: &str) -> ElResult<Value> {
        self.index(&Value::from(key))
    }

    /// Whether `self[index]` would succeed.
    pub fn contains(&self, index: &Value) -> bool {
        match self.kind() {
            ValueKind::Array(_) | ValueKind::Range(_) | ValueKind::String(_) => self
                .length()
                .is_ok_and(|len| self.select(index, len).is_ok()),
            ValueKind::Map(map) => match index.kind() {
                ValueKind::String(key) => map.contains_key(key),
                ValueKind::Array(keys) => keys
                    .iter()
                    .all(|key| key.as_str().is_ok_and(|k| map.contains_key(k))),
                _ => false,
            },
            _ => false,
        }
    }

    /// Whether `self` has the integer index `index`.
    pub fn contains_index(&self, index: i64) -> bool {
        self.contains(&Value::from(index))
    }

    /// Whether `self` is a map with the key `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.contains(&Value::from(key))
    }

    fn select(&self, index: &Value, len: usize) -> ElResult<Selection> {
        match index.kind() {
            ValueKind::Number(n) => self.resolve(*n, index, len).map(Selection::Single),
            ValueKind::Range(values) => values
                .iter()
                .map(|&raw| {
                    resolve_index(raw, len).ok_or_else(|| {
                        ElError::index_out_of_bounds(self.describe(), raw.to_string())
                    })
                })
                .collect::<ElResult<Vec<_>>>()
                .map(Selection::Many),
            ValueKind::Array(items) => items
                .iter()
                .map(|item| match item.kind() {
                    ValueKind::Number(n) => self.resolve(*n, item, len),
                    _ => Err(ElError::index(self.describe(), item.describe())),
                })
                .collect::<ElResult<Vec<_>>>()
                .map(Selection::Many),
            _ => Err(ElError::index(self.describe(), index.describe())),
        }
    }

    fn resolve(&self, n: f64, index: &Value, len: usize) -> ElResult<usize> {
        if !n.is_finite() {
            return Err(ElError::index(self.describe(), index.describe()));
        }
        resolve_index(n.trunc() as i64, len)
            .ok_or_else(|| ElError::index_out_of_bounds(self.describe(), index.describe()))
    }
}
