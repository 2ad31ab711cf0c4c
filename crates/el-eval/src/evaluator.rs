//! Core expression evaluator.

use crate::config::EvalConfig;
use crate::env::{Environment, EvaluationStack};
use el_types::ast::{BinaryOp, Expr, ExprKind, UnaryOp, AUTO_RANGE_PARAMETER};
use el_types::{inclusive_range, inclusive_range_len, ElError, ElResult, Value, ValueKind};
use std::collections::BTreeMap;
use tracing::trace;

/// Walks expression trees and produces values.
///
/// The evaluator holds no mutable state, so one instance can serve any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate `expr` against `env`.
    ///
    /// Both operands of every operator are evaluated; there is no
    /// short-circuiting. Errors carry the position of the innermost node
    /// that raised them.
    pub fn evaluate(&self, expr: &Expr, env: &dyn Environment) -> ElResult<Value> {
        self.eval_expr(expr, env)
    }

    fn eval_expr(&self, expr: &Expr, env: &dyn Environment) -> ElResult<Value> {
        let result = match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Variable(name) => self.eval_variable(name, env),
            ExprKind::Array(elements) => self.eval_array(elements, env),
            ExprKind::Map(entries) => self.eval_map(entries, env),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, env),
            ExprKind::Subscript { indexable, index } => {
                self.eval_subscript(indexable, index, env)
            }
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right, env),
        };
        result
            .map(|value| value.with_position(expr.position))
            .map_err(|err| err.at(expr.position))
    }

    // ── Leaves & constructors ─────────────────────────────────────────────

    fn eval_variable(&self, name: &str, env: &dyn Environment) -> ElResult<Value> {
        let value = env.variable_value(name);
        if name == AUTO_RANGE_PARAMETER && value.is_undefined() {
            return Err(ElError::evaluation(
                "open-ended range requires a subscript of an indexable value",
            ));
        }
        Ok(value)
    }

    fn eval_array(&self, elements: &[Expr], env: &dyn Environment) -> ElResult<Value> {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(self.eval_expr(element, env)?);
        }
        Ok(Value::from(values))
    }

    fn eval_map(&self, entries: &[(String, Expr)], env: &dyn Environment) -> ElResult<Value> {
        let mut map = BTreeMap::new();
        for (key, expr) in entries {
            map.insert(key.clone(), self.eval_expr(expr, env)?);
        }
        Ok(Value::new(ValueKind::Map(map)))
    }

    // ── Operators ─────────────────────────────────────────────────────────

    fn eval_unary(&self, op: UnaryOp, operand: &Expr, env: &dyn Environment) -> ElResult<Value> {
        let value = self.eval_expr(operand, env)?;
        match op {
            UnaryOp::Plus => value.unary_plus(),
            UnaryOp::Minus => value.unary_minus(),
            UnaryOp::Not => Ok(value.logical_not()),
            UnaryOp::Group => Ok(value),
        }
    }

    fn eval_binary(
        &self,
        left: &Expr,
        op: BinaryOp,
        right: &Expr,
        env: &dyn Environment,
    ) -> ElResult<Value> {
        let lhs = self.eval_expr(left, env)?;
        let rhs = self.eval_expr(right, env)?;
        match op {
            BinaryOp::Add => lhs.add(&rhs),
            BinaryOp::Sub => lhs.subtract(&rhs),
            BinaryOp::Mul => lhs.multiply(&rhs),
            BinaryOp::Div => lhs.divide(&rhs),
            BinaryOp::Mod => lhs.modulo(&rhs),
            BinaryOp::And => Ok(lhs.and(&rhs)),
            BinaryOp::Or => Ok(lhs.or(&rhs)),
            BinaryOp::Less => Ok(Value::from(lhs.compare(&rhs)?.is_lt())),
            BinaryOp::LessEq => Ok(Value::from(lhs.compare(&rhs)?.is_le())),
            BinaryOp::Eq => Ok(Value::from(lhs.compare(&rhs)?.is_eq())),
            BinaryOp::NotEq => Ok(Value::from(lhs.compare(&rhs)?.is_ne())),
            BinaryOp::GreaterEq => Ok(Value::from(lhs.compare(&rhs)?.is_ge())),
            BinaryOp::Greater => Ok(Value::from(lhs.compare(&rhs)?.is_gt())),
            BinaryOp::Range => self.eval_range(&lhs, &rhs),
        }
    }

    fn eval_range(&self, lhs: &Value, rhs: &Value) -> ElResult<Value> {
        let (from, to) = lhs.range_bounds(rhs)?;
        if let Some(limit) = self.config.max_range_length {
            let len = inclusive_range_len(from, to);
            if len > limit as u64 {
                return Err(ElError::evaluation(format!(
                    "range {from}..{to} has {len} elements, more than the limit of {limit}"
                )));
            }
        }
        Ok(Value::range(inclusive_range(from, to)))
    }

    // ── Subscripts ────────────────────────────────────────────────────────

    /// Evaluate `indexable[index]`. The index is evaluated in a child scope
    /// where open-ended ranges see the last valid index of `indexable`.
    fn eval_subscript(
        &self,
        indexable: &Expr,
        index: &Expr,
        env: &dyn Environment,
    ) -> ElResult<Value> {
        let target = self.eval_expr(indexable, env)?;
        let mut scope = EvaluationStack::new(env);
        if let Ok(len) = target.length() {
            let last = len as f64 - 1.0;
            trace!(last_index = last, "binding auto-range parameter");
            scope.declare_variable(AUTO_RANGE_PARAMETER, Value::from(last))?;
        }
        let key = self.eval_expr(index, &scope)?;
        target.index(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EvaluationContext;
    use el_types::{ErrorKind, Position};

    fn lit(v: impl Into<Value>) -> Expr {
        Expr::literal(v, Position::ZERO)
    }

    fn eval(expr: &Expr) -> ElResult<Value> {
        Evaluator::default().evaluate(expr, &EvaluationContext::new())
    }

    #[test]
    fn test_literal_takes_node_position() {
        let pos = Position::new(2, 5);
        let value = eval(&Expr::literal(1, pos)).unwrap();
        assert_eq!(value.position(), pos);
    }

    #[test]
    fn test_map_last_write_wins() {
        let e = Expr::map(vec![("a", lit(1)), ("a", lit(2))], Position::ZERO);
        assert_eq!(eval(&e).unwrap().get("a").unwrap(), Value::from(2));
    }

    #[test]
    fn test_group_is_transparent() {
        let e = Expr::group(lit("x"), Position::ZERO);
        assert_eq!(eval(&e).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_comparisons() {
        let cases = [
            (BinaryOp::Less, false),
            (BinaryOp::LessEq, true),
            (BinaryOp::Eq, true),
            (BinaryOp::NotEq, false),
            (BinaryOp::GreaterEq, true),
            (BinaryOp::Greater, false),
        ];
        for (op, expected) in cases {
            let e = Expr::binary(lit(2), op, lit("2"), Position::ZERO);
            assert_eq!(eval(&e).unwrap(), Value::from(expected), "{op}");
        }
    }

    #[test]
    fn test_range_limit() {
        let evaluator = Evaluator::new(EvalConfig::default().with_max_range_length(3));
        let ctx = EvaluationContext::new();
        let ok = Expr::range(lit(1), lit(3), Position::ZERO);
        assert_eq!(
            evaluator.evaluate(&ok, &ctx).unwrap(),
            Value::range(vec![1, 2, 3])
        );
        let too_long = Expr::range(lit(0), lit(3), Position::new(1, 1));
        let err = evaluator.evaluate(&too_long, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(err.position(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_auto_range_outside_subscript_fails() {
        let e = Expr::auto_range_from(lit(0), Position::new(1, 4));
        let err = eval(&e).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Evaluation);
        assert_eq!(err.position(), Some(Position::new(1, 4)));
    }

    #[test]
    fn test_subscript_does_not_leak_auto_range() {
        let ctx = EvaluationContext::new();
        let e = Expr::subscript(
            Expr::array(vec![lit(1), lit(2)], Position::ZERO),
            Expr::auto_range_from(lit(0), Position::ZERO),
            Position::ZERO,
        );
        Evaluator::default().evaluate(&e, &ctx).unwrap();
        assert!(ctx.variable_value(AUTO_RANGE_PARAMETER).is_undefined());
    }
}
