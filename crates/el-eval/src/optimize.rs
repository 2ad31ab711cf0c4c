//! Constant folding.

use crate::env::EvaluationContext;
use crate::evaluator::Evaluator;
use el_types::ast::{BinaryOp, Expr, ExprKind};
use tracing::{debug, trace};

impl Evaluator {
    /// Fold every variable-free subtree into a literal.
    ///
    /// Subtrees whose evaluation fails are kept as they are, so the error is
    /// raised when the expression is actually evaluated. `..` nodes are never
    /// folded: their size is checked against the range limit of whichever
    /// evaluator runs the expression.
    pub fn optimize(&self, expr: Expr) -> Expr {
        let empty = EvaluationContext::new();
        let mut folded = 0usize;
        let optimized = self.fold(expr, &empty, &mut folded);
        debug!(folded, "optimized expression");
        optimized
    }

    fn fold(&self, expr: Expr, empty: &EvaluationContext, folded: &mut usize) -> Expr {
        let position = expr.position;
        let node = match expr.kind {
            kind @ (ExprKind::Literal(_) | ExprKind::Variable(_)) => {
                return Expr::new(kind, position);
            }
            ExprKind::Array(elements) => Expr::array(
                elements
                    .into_iter()
                    .map(|element| self.fold(element, empty, folded))
                    .collect(),
                position,
            ),
            ExprKind::Map(entries) => Expr::new(
                ExprKind::Map(
                    entries
                        .into_iter()
                        .map(|(key, value)| (key, self.fold(value, empty, folded)))
                        .collect(),
                ),
                position,
            ),
            ExprKind::Unary { op, operand } => {
                Expr::unary(op, self.fold(*operand, empty, folded), position)
            }
            ExprKind::Subscript { indexable, index } => Expr::subscript(
                self.fold(*indexable, empty, folded),
                self.fold(*index, empty, folded),
                position,
            ),
            ExprKind::Binary { left, op, right } => Expr::binary(
                self.fold(*left, empty, folded),
                op,
                self.fold(*right, empty, folded),
                position,
            ),
        };

        if node.binary_op() == Some(BinaryOp::Range)
            || !node.children().iter().all(|child| child.is_literal())
        {
            return node;
        }
        match self.evaluate(&node, empty) {
            Ok(value) => {
                *folded += 1;
                trace!(%node, %value, "folded constant");
                Expr::literal(value, position)
            }
            Err(err) => {
                trace!(%node, %err, "kept subtree that fails to evaluate");
                node
            }
        }
    }
}
