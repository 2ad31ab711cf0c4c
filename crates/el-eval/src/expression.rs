use crate::env::Environment;
use crate::evaluator::Evaluator;
use crate::reorder::reorder_by_precedence;
use el_types::ast::{Expr, ExprKind};
use el_types::{ElResult, Position, Value};
use std::fmt;
use std::mem;

/// A complete expression, ready to evaluate.
///
/// Construction restores operator precedence. Evaluation only borrows the
/// tree, so one expression can be evaluated from several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Expr,
}

impl Expression {
    /// Wrap a tree as built by a precedence-naive parser.
    pub fn new(root: Expr) -> Self {
        Self {
            root: reorder_by_precedence(root),
        }
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    pub fn into_root(self) -> Expr {
        self.root
    }

    /// Fold constant subtrees with the default evaluator.
    pub fn optimize(&mut self) {
        self.optimize_with(&Evaluator::default());
    }

    pub fn optimize_with(&mut self, evaluator: &Evaluator) {
        let placeholder = Expr::new(ExprKind::Literal(Value::UNDEFINED), Position::ZERO);
        let root = mem::replace(&mut self.root, placeholder);
        self.root = evaluator.optimize(root);
    }

    pub fn evaluate(&self, env: &dyn Environment) -> ElResult<Value> {
        self.evaluate_with(&Evaluator::default(), env)
    }

    pub fn evaluate_with(&self, evaluator: &Evaluator, env: &dyn Environment) -> ElResult<Value> {
        evaluator.evaluate(&self.root, env)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
