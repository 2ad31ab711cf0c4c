//! The dynamic value model.
//!
//! A [`Value`] is one of eight variants and carries the source position it
//! was produced at. Values are never mutated: conversions and operators
//! always build new values.

use crate::{ElError, ElResult, Position};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

static EMPTY_MAP: BTreeMap<String, Value> = BTreeMap::new();

// ══════════════════════════════════════════════════════════════════════════════
// Value Types
// ══════════════════════════════════════════════════════════════════════════════

/// The variant tag of a [`Value`].
///
/// The declaration order is the rank used by the total order on values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum ValueType {
    Boolean,
    String,
    Number,
    Array,
    Map,
    Range,
    Null,
    Undefined,
}

impl ValueType {
    pub const ALL: [ValueType; 8] = [
        ValueType::Boolean,
        ValueType::String,
        ValueType::Number,
        ValueType::Array,
        ValueType::Map,
        ValueType::Range,
        ValueType::Null,
        ValueType::Undefined,
    ];

    /// Returns the type name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "Boolean",
            ValueType::String => "String",
            ValueType::Number => "Number",
            ValueType::Array => "Array",
            ValueType::Map => "Map",
            ValueType::Range => "Range",
            ValueType::Null => "Null",
            ValueType::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = ElError;

    fn from_str(s: &str) -> ElResult<Self> {
        ValueType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ElError::evaluation(format!("unknown type name '{s}'")))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Values
// ══════════════════════════════════════════════════════════════════════════════

/// The payload of a [`Value`].
#[derive(Debug, Clone)]
pub enum ValueKind {
    Boolean(bool),
    String(String),
    Number(f64),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A materialized integer sequence, in iteration order.
    Range(Vec<i64>),
    /// Explicit absence of a value.
    Null,
    /// No value was produced, e.g. an unbound variable.
    Undefined,
}

impl ValueKind {
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::String(_) => ValueType::String,
            ValueKind::Number(_) => ValueType::Number,
            ValueKind::Array(_) => ValueType::Array,
            ValueKind::Map(_) => ValueType::Map,
            ValueKind::Range(_) => ValueType::Range,
            ValueKind::Null => ValueType::Null,
            ValueKind::Undefined => ValueType::Undefined,
        }
    }
}

/// A dynamically typed EL value.
///
/// Equality and ordering ignore the position and form a strict total order
/// (see [`Ord`] below), so values can be used as set and sort keys. The
/// coercing comparison used by the `<`/`==` operators is [`Value::compare`].
#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    position: Position,
}

impl Value {
    pub const NULL: Value = Value {
        kind: ValueKind::Null,
        position: Position::ZERO,
    };

    pub const UNDEFINED: Value = Value {
        kind: ValueKind::Undefined,
        position: Position::ZERO,
    };

    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            position: Position::ZERO,
        }
    }

    /// Create a range value from an already materialized integer sequence.
    pub fn range(values: Vec<i64>) -> Self {
        Self::new(ValueKind::Range(values))
    }

    /// Re-tag this value with a source position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn value_type(&self) -> ValueType {
        self.kind.value_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// True for both `Null` and `Undefined`.
    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null | ValueKind::Undefined)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.kind, ValueKind::Undefined)
    }

    // ── Accessors ────────────────────────────────────────────────────────

    fn dereference_error(&self, to: ValueType) -> ElError {
        ElError::dereference(self.describe(), self.value_type(), to)
    }

    /// The boolean payload. `Null` reads as `false`.
    pub fn as_boolean(&self) -> ElResult<bool> {
        match &self.kind {
            ValueKind::Boolean(b) => Ok(*b),
            ValueKind::Null => Ok(false),
            _ => Err(self.dereference_error(ValueType::Boolean)),
        }
    }

    /// The string payload. `Null` reads as the empty string.
    pub fn as_str(&self) -> ElResult<&str> {
        match &self.kind {
            ValueKind::String(s) => Ok(s),
            ValueKind::Null => Ok(""),
            _ => Err(self.dereference_error(ValueType::String)),
        }
    }

    /// The number payload. `Null` reads as `0`.
    pub fn as_number(&self) -> ElResult<f64> {
        match &self.kind {
            ValueKind::Number(n) => Ok(*n),
            ValueKind::Null => Ok(0.0),
            _ => Err(self.dereference_error(ValueType::Number)),
        }
    }

    /// The array payload. `Null` reads as the empty array.
    pub fn as_array(&self) -> ElResult<&[Value]> {
        match &self.kind {
            ValueKind::Array(items) => Ok(items),
            ValueKind::Null => Ok(&[]),
            _ => Err(self.dereference_error(ValueType::Array)),
        }
    }

    /// The map payload. `Null` reads as the empty map.
    pub fn as_map(&self) -> ElResult<&BTreeMap<String, Value>> {
        match &self.kind {
            ValueKind::Map(map) => Ok(map),
            ValueKind::Null => Ok(&EMPTY_MAP),
            _ => Err(self.dereference_error(ValueType::Map)),
        }
    }

    pub fn as_range(&self) -> ElResult<&[i64]> {
        match &self.kind {
            ValueKind::Range(values) => Ok(values),
            _ => Err(self.dereference_error(ValueType::Range)),
        }
    }

    /// Number of elements of a string (in characters), array, map or range.
    ///
    /// `Null` has length 0. Booleans, numbers and `Undefined` have no
    /// length.
    pub fn length(&self) -> ElResult<usize> {
        match &self.kind {
            ValueKind::String(s) => Ok(s.chars().count()),
            ValueKind::Array(items) => Ok(items.len()),
            ValueKind::Map(map) => Ok(map.len()),
            ValueKind::Range(values) => Ok(values.len()),
            ValueKind::Null => Ok(0),
            ValueKind::Boolean(_) | ValueKind::Number(_) | ValueKind::Undefined => {
                Err(ElError::evaluation(format!(
                    "value '{}' of type '{}' has no length",
                    self.describe(),
                    self.type_name()
                )))
            }
        }
    }

    /// The keys of a map.
    pub fn keys(&self) -> ElResult<BTreeSet<String>> {
        Ok(self.as_map()?.keys().cloned().collect())
    }

    /// Convert every element of an array to a string.
    pub fn as_string_list(&self) -> ElResult<Vec<String>> {
        self.as_array()?.iter().map(Value::stringify).collect()
    }

    /// Convert every element of an array to a string, dropping duplicates.
    pub fn as_string_set(&self) -> ElResult<BTreeSet<String>> {
        self.as_array()?.iter().map(Value::stringify).collect()
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// A single-line, human-readable rendering of this value.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.append_to(&mut out, false, "");
        out
    }

    /// Render this value into `out`.
    ///
    /// In multi-line mode every array element and map entry goes on its own
    /// line, indented by one tab relative to `indent`.
    pub fn append_to(&self, out: &mut String, multiline: bool, indent: &str) {
        match &self.kind {
            ValueKind::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            ValueKind::String(s) => append_quoted(out, s),
            ValueKind::Number(n) => out.push_str(&format_number(*n)),
            ValueKind::Array(items) => {
                append_composite(out, multiline, indent, ("[", "]"), items, |out, item, indent| {
                    item.append_to(out, multiline, indent)
                })
            }
            ValueKind::Map(map) => {
                append_composite(
                    out,
                    multiline,
                    indent,
                    ("{", "}"),
                    map,
                    |out, (key, item), indent| {
                        append_quoted(out, key);
                        out.push_str(": ");
                        item.append_to(out, multiline, indent);
                    },
                )
            }
            ValueKind::Range(values) => {
                append_composite(out, multiline, indent, ("[", "]"), values, |out, n, _| {
                    out.push_str(&n.to_string())
                })
            }
            ValueKind::Null => out.push_str("null"),
            ValueKind::Undefined => out.push_str("undefined"),
        }
    }
}

/// Format a number the way conversions to `String` do: the shortest text that
/// parses back to the same `f64`, with no fractional part for integers.
pub(crate) fn format_number(n: f64) -> String {
    format!("{n}")
}

fn append_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn append_composite<I, F>(
    out: &mut String,
    multiline: bool,
    indent: &str,
    (open, close): (&str, &str),
    items: I,
    mut append_item: F,
) where
    I: IntoIterator,
    F: FnMut(&mut String, I::Item, &str),
{
    let mut items = items.into_iter().peekable();
    out.push_str(open);
    if items.peek().is_none() {
        out.push_str(close);
        return;
    }

    let child_indent = format!("{indent}\t");
    let mut first = true;
    for item in items {
        if !first {
            out.push(',');
        }
        first = false;
        if multiline {
            out.push('\n');
            out.push_str(&child_indent);
        } else {
            out.push(' ');
        }
        append_item(out, item, &child_indent);
    }
    if multiline {
        out.push('\n');
        out.push_str(indent);
    } else {
        out.push(' ');
    }
    out.push_str(close);
}

impl fmt::Display for Value {
    /// `{}` renders on one line, `{:#}` renders multi-line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.append_to(&mut out, f.alternate(), "");
        f.write_str(&out)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Total Order
// ══════════════════════════════════════════════════════════════════════════════

/// Numeric ordering shared by the total order and the coercing comparison.
///
/// `-0` equals `0`; NaN equals NaN and sorts above every other number.
pub(crate) fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.kind, &other.kind) {
            (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a.cmp(b),
            (ValueKind::String(a), ValueKind::String(b)) => a.cmp(b),
            (ValueKind::Number(a), ValueKind::Number(b)) => compare_numbers(*a, *b),
            (ValueKind::Array(a), ValueKind::Array(b)) => a.iter().cmp(b.iter()),
            (ValueKind::Map(a), ValueKind::Map(b)) => a.iter().cmp(b.iter()),
            (ValueKind::Range(a), ValueKind::Range(b)) => a.cmp(b),
            (a, b) => a.value_type().cmp(&b.value_type()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

// ══════════════════════════════════════════════════════════════════════════════
// Construction
// ══════════════════════════════════════════════════════════════════════════════

impl From<ValueKind> for Value {
    fn from(kind: ValueKind) -> Self {
        Value::new(kind)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::new(ValueKind::Boolean(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::new(ValueKind::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::new(ValueKind::String(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::new(ValueKind::Number(n))
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::new(ValueKind::Number(n as f64))
                }
            }
        )*
    };
}

number_from!(f32, i32, i64, u32, usize);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::new(ValueKind::Array(items.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::new(ValueKind::Map(
            map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::new(ValueKind::Map(
            map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        ))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::NULL,
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => Value::from(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => Value::from(items),
            serde_json::Value::Object(fields) => Value::new(ValueKind::Map(
                fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.kind {
            ValueKind::Boolean(b) => serializer.serialize_bool(*b),
            ValueKind::String(s) => serializer.serialize_str(s),
            ValueKind::Number(n) => serializer.serialize_f64(*n),
            ValueKind::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ValueKind::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, item) in map {
                    out.serialize_entry(key, item)?;
                }
                out.end()
            }
            ValueKind::Range(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for n in values {
                    seq.serialize_element(n)?;
                }
                seq.end()
            }
            ValueKind::Null | ValueKind::Undefined => serializer.serialize_none(),
        }
    }
}
