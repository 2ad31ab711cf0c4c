//! Operator semantics over values: arithmetic, logic, comparison and ranges.
//!
//! Operators never mutate their operands. Conversion failures surface as
//! evaluation errors naming the operator and the operand types.

use crate::value::compare_numbers;
use crate::{ElError, ElResult, Value, ValueKind};
use std::cmp::Ordering;

fn binary_mismatch(symbol: &str, lhs: &Value, rhs: &Value) -> String {
    format!(
        "cannot apply '{symbol}' to {} and {}",
        lhs.type_name(),
        rhs.type_name()
    )
}

impl Value {
    /// Truthiness: booleans are themselves, numbers are non-zero, strings
    /// and collections are non-empty, `Null` and `Undefined` are false.
    pub fn is_truthy(&self) -> bool {
        match self.kind() {
            ValueKind::Boolean(b) => *b,
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::String(s) => !s.is_empty(),
            ValueKind::Array(items) => !items.is_empty(),
            ValueKind::Map(map) => !map.is_empty(),
            ValueKind::Range(values) => !values.is_empty(),
            ValueKind::Null | ValueKind::Undefined => false,
        }
    }

    // ── Unary ────────────────────────────────────────────────────────────

    /// `+v`: numeric identity.
    pub fn unary_plus(&self) -> ElResult<Value> {
        let n = self.to_number().map_err(|e| {
            e.into_evaluation(format!("cannot apply unary '+' to {}", self.type_name()))
        })?;
        Ok(Value::from(n))
    }

    /// `-v`: numeric negation.
    pub fn unary_minus(&self) -> ElResult<Value> {
        let n = self.to_number().map_err(|e| {
            e.into_evaluation(format!("cannot apply unary '-' to {}", self.type_name()))
        })?;
        Ok(Value::from(-n))
    }

    /// `!v`: negated truthiness.
    pub fn logical_not(&self) -> Value {
        Value::from(!self.is_truthy())
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    /// `lhs + rhs`.
    ///
    /// Arrays concatenate, maps merge with the right operand winning, a
    /// string on either side concatenates both operands as strings, and
    /// everything else adds numerically.
    pub fn add(&self, rhs: &Value) -> ElResult<Value> {
        match (self.kind(), rhs.kind()) {
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                Ok(Value::from(a.iter().chain(b).cloned().collect::<Vec<_>>()))
            }
            (ValueKind::Map(a), ValueKind::Map(b)) => {
                let mut merged = a.clone();
                merged.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(Value::new(ValueKind::Map(merged)))
            }
            (ValueKind::String(_), _) | (_, ValueKind::String(_)) => {
                let mismatch = || binary_mismatch("+", self, rhs);
                let mut out = self.stringify().map_err(|e| e.into_evaluation(mismatch()))?;
                out.push_str(&rhs.stringify().map_err(|e| e.into_evaluation(mismatch()))?);
                Ok(Value::from(out))
            }
            _ => self.arithmetic(rhs, "+", |a, b| a + b),
        }
    }

    /// `lhs - rhs`.
    pub fn subtract(&self, rhs: &Value) -> ElResult<Value> {
        self.arithmetic(rhs, "-", |a, b| a - b)
    }

    /// `lhs * rhs`.
    pub fn multiply(&self, rhs: &Value) -> ElResult<Value> {
        self.arithmetic(rhs, "*", |a, b| a * b)
    }

    /// `lhs / rhs`. Division by zero yields an infinity or NaN.
    pub fn divide(&self, rhs: &Value) -> ElResult<Value> {
        self.arithmetic(rhs, "/", |a, b| a / b)
    }

    /// `lhs % rhs`, the floating-point remainder.
    pub fn modulo(&self, rhs: &Value) -> ElResult<Value> {
        self.arithmetic(rhs, "%", |a, b| a % b)
    }

    fn arithmetic(&self, rhs: &Value, symbol: &str, op: fn(f64, f64) -> f64) -> ElResult<Value> {
        let mismatch = || binary_mismatch(symbol, self, rhs);
        let a = self.to_number().map_err(|e| e.into_evaluation(mismatch()))?;
        let b = rhs.to_number().map_err(|e| e.into_evaluation(mismatch()))?;
        Ok(Value::from(op(a, b)))
    }

    // ── Logic ────────────────────────────────────────────────────────────

    /// `lhs && rhs` over truthiness. Both operands are already evaluated.
    pub fn and(&self, rhs: &Value) -> Value {
        Value::from(self.is_truthy() && rhs.is_truthy())
    }

    /// `lhs || rhs` over truthiness. Both operands are already evaluated.
    pub fn or(&self, rhs: &Value) -> Value {
        Value::from(self.is_truthy() || rhs.is_truthy())
    }

    // ── Comparison ───────────────────────────────────────────────────────

    /// The comparison behind `<`, `<=`, `==`, `!=`, `>=` and `>`.
    ///
    /// Rules, first match wins:
    /// 1. two booleans compare as booleans (`false < true`);
    /// 2. two arrays, maps, ranges, nulls or undefineds compare structurally;
    /// 3. if both sides convert to numbers, they compare numerically;
    /// 4. if both sides convert to strings, they compare lexicographically.
    ///
    /// Anything else cannot be compared.
    pub fn compare(&self, rhs: &Value) -> ElResult<Ordering> {
        match (self.kind(), rhs.kind()) {
            (ValueKind::Boolean(a), ValueKind::Boolean(b)) => return Ok(a.cmp(b)),
            (ValueKind::Array(_), ValueKind::Array(_))
            | (ValueKind::Map(_), ValueKind::Map(_))
            | (ValueKind::Range(_), ValueKind::Range(_))
            | (ValueKind::Null, ValueKind::Null)
            | (ValueKind::Undefined, ValueKind::Undefined) => return Ok(self.cmp(rhs)),
            _ => {}
        }

        if let (Ok(a), Ok(b)) = (self.to_number(), rhs.to_number()) {
            return Ok(compare_numbers(a, b));
        }
        if let (Ok(a), Ok(b)) = (self.stringify(), rhs.stringify()) {
            return Ok(a.cmp(&b));
        }
        Err(ElError::evaluation(format!(
            "cannot compare '{}' of type {} with '{}' of type {}",
            self.describe(),
            self.type_name(),
            rhs.describe(),
            rhs.type_name()
        )))
    }

    // ── Ranges ───────────────────────────────────────────────────────────

    /// The integer bounds of `self..rhs`: both sides converted to numbers
    /// and truncated.
    pub fn range_bounds(&self, rhs: &Value) -> ElResult<(i64, i64)> {
        let mismatch = || binary_mismatch("..", self, rhs);
        let from = self.to_number().map_err(|e| e.into_evaluation(mismatch()))?;
        let to = rhs.to_number().map_err(|e| e.into_evaluation(mismatch()))?;
        Ok((from.trunc() as i64, to.trunc() as i64))
    }

    /// `self..rhs`: the inclusive integer sequence between both bounds.
    pub fn range_to(&self, rhs: &Value) -> ElResult<Value> {
        let (from, to) = self.range_bounds(rhs)?;
        Ok(Value::range(inclusive_range(from, to)))
    }
}

/// All integers from `from` to `to` inclusive, descending when `from > to`.
pub fn inclusive_range(from: i64, to: i64) -> Vec<i64> {
    if from <= to {
        (from..=to).collect()
    } else {
        (to..=from).rev().collect()
    }
}

/// Number of elements [`inclusive_range`] would produce.
pub fn inclusive_range_len(from: i64, to: i64) -> u64 {
    from.abs_diff(to).saturating_add(1)
}
