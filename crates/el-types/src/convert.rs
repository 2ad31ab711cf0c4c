//! Conversions between value types.

use crate::value::format_number;
use crate::{ElError, ElResult, Value, ValueKind, ValueType};
use std::collections::BTreeMap;

impl Value {
    /// Convert this value to another type.
    ///
    /// The conversion is defined for every pair of types but not every pair
    /// succeeds; failures are reported as conversion errors. The result keeps
    /// this value's position.
    pub fn convert_to(&self, to: ValueType) -> ElResult<Value> {
        let from = self.value_type();
        if from == to {
            return Ok(self.clone());
        }

        let converted = match (self.kind(), to) {
            (ValueKind::Boolean(b), ValueType::String) => Some(ValueKind::String(b.to_string())),
            (ValueKind::Boolean(b), ValueType::Number) => {
                Some(ValueKind::Number(if *b { 1.0 } else { 0.0 }))
            }

            (ValueKind::String(s), ValueType::Boolean) => match s.as_str() {
                "true" => Some(ValueKind::Boolean(true)),
                "false" => Some(ValueKind::Boolean(false)),
                _ => None,
            },
            (ValueKind::String(s), ValueType::Number) => {
                s.parse::<f64>().ok().map(ValueKind::Number)
            }

            (ValueKind::Number(n), ValueType::Boolean) => Some(ValueKind::Boolean(*n != 0.0)),
            (ValueKind::Number(n), ValueType::String) => {
                Some(ValueKind::String(format_number(*n)))
            }

            (ValueKind::Array(items), ValueType::Range) => {
                integers_of(items).map(ValueKind::Range)
            }

            (ValueKind::Null, ValueType::Boolean) => Some(ValueKind::Boolean(false)),
            (ValueKind::Null, ValueType::Number) => Some(ValueKind::Number(0.0)),
            (ValueKind::Null, ValueType::String) => Some(ValueKind::String(String::new())),
            (ValueKind::Null, ValueType::Array) => Some(ValueKind::Array(Vec::new())),
            (ValueKind::Null, ValueType::Map) => Some(ValueKind::Map(BTreeMap::new())),

            _ => None,
        };

        converted
            .map(|kind| Value::new(kind).with_position(self.position()))
            .ok_or_else(|| ElError::conversion(self.describe(), from, to))
    }

    /// Convert to a number and return the raw `f64`.
    pub fn to_number(&self) -> ElResult<f64> {
        match self.kind() {
            ValueKind::Number(n) => Ok(*n),
            _ => self.convert_to(ValueType::Number)?.as_number(),
        }
    }

    /// Convert to a string and return the raw text. Strings are returned
    /// unquoted.
    pub fn stringify(&self) -> ElResult<String> {
        match self.kind() {
            ValueKind::String(s) => Ok(s.clone()),
            _ => Ok(self.convert_to(ValueType::String)?.as_str()?.to_string()),
        }
    }
}

/// The integers an array converts to, in array order. Every element must
/// convert to an integral number that fits in an `i64`.
fn integers_of(items: &[Value]) -> Option<Vec<i64>> {
    items
        .iter()
        .map(|item| {
            let n = item.to_number().ok()?;
            let fits = n.is_finite()
                && n.fract() == 0.0
                && n >= i64::MIN as f64
                && n < i64::MAX as f64;
            fits.then_some(n as i64)
        })
        .collect()
}
