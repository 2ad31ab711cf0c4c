//! Precedence restoration for trees built without operator precedence.
//!
//! A parser that folds binary operators strictly left to right produces
//! `(3 + 4) * 2` for `3 + 4 * 2`. [`reorder_by_precedence`] rotates such
//! trees until every binary node binds at least as tightly as its parent,
//! keeping the in-order sequence of operands unchanged. Non-binary nodes,
//! parenthesized groups included, are never rotated through.

use el_types::ast::{BinaryOp, Expr, ExprKind};
use el_types::Position;
use tracing::{debug, trace};

/// Restore operator precedence and associativity in `expr`.
pub fn reorder_by_precedence(expr: Expr) -> Expr {
    let mut rotations = 0usize;
    let reordered = reorder(expr, &mut rotations);
    debug!(rotations, "reordered expression by precedence");
    reordered
}

/// Settle every subtree bottom-up.
fn reorder(expr: Expr, rotations: &mut usize) -> Expr {
    let position = expr.position;
    match expr.kind {
        ExprKind::Binary { left, op, right } => {
            let left = reorder(*left, rotations);
            let right = reorder(*right, rotations);
            settle(Expr::binary(left, op, right, position), rotations)
        }
        ExprKind::Unary { op, operand } => {
            Expr::unary(op, reorder(*operand, rotations), position)
        }
        ExprKind::Subscript { indexable, index } => Expr::subscript(
            reorder(*indexable, rotations),
            reorder(*index, rotations),
            position,
        ),
        ExprKind::Array(elements) => Expr::array(
            elements
                .into_iter()
                .map(|element| reorder(element, rotations))
                .collect(),
            position,
        ),
        ExprKind::Map(entries) => Expr::new(
            ExprKind::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, reorder(value, rotations)))
                    .collect(),
            ),
            position,
        ),
        kind @ (ExprKind::Literal(_) | ExprKind::Variable(_)) => Expr::new(kind, position),
    }
}

/// Rotate a binary node whose children are already settled until the node
/// itself is settled.
fn settle(expr: Expr, rotations: &mut usize) -> Expr {
    match expr.kind {
        ExprKind::Binary { left, op, right } => {
            if promotes_left(op, &left) {
                rotate_right_up(*left, op, *right, expr.position, rotations)
            } else if promotes_right(op, &right) {
                rotate_left_up(*left, op, *right, expr.position, rotations)
            } else {
                Expr::binary(*left, op, *right, expr.position)
            }
        }
        kind => Expr::new(kind, expr.position),
    }
}

/// The left child binds looser than its parent.
fn promotes_left(parent: BinaryOp, left: &Expr) -> bool {
    left.binary_op()
        .is_some_and(|child| child.precedence() < parent.precedence())
}

/// The right child binds looser than its parent, or as tightly but both
/// operators can be regrouped to the left without changing the result.
fn promotes_right(parent: BinaryOp, right: &Expr) -> bool {
    right.binary_op().is_some_and(|child| {
        let (p, c) = (parent.traits(), child.traits());
        c.precedence < p.precedence
            || (c.precedence == p.precedence
                && p.associative
                && c.associative
                && p.commutative == c.commutative)
    })
}

/// `(a L b) P c` becomes `a L (b P c)`.
fn rotate_right_up(
    left: Expr,
    op: BinaryOp,
    right: Expr,
    position: Position,
    rotations: &mut usize,
) -> Expr {
    match left.kind {
        ExprKind::Binary {
            left: a,
            op: lower,
            right: b,
        } => {
            *rotations += 1;
            trace!(outer = %lower, inner = %op, "rotating left child up");
            let inner = settle(Expr::binary(*b, op, right, position), rotations);
            settle(Expr::binary(*a, lower, inner, left.position), rotations)
        }
        kind => Expr::binary(Expr::new(kind, left.position), op, right, position),
    }
}

/// `a P (b R c)` becomes `(a P b) R c`.
fn rotate_left_up(
    left: Expr,
    op: BinaryOp,
    right: Expr,
    position: Position,
    rotations: &mut usize,
) -> Expr {
    match right.kind {
        ExprKind::Binary {
            left: b,
            op: lower,
            right: c,
        } => {
            *rotations += 1;
            trace!(outer = %lower, inner = %op, "rotating right child up");
            let inner = settle(Expr::binary(left, op, *b, position), rotations);
            settle(Expr::binary(inner, lower, *c, right.position), rotations)
        }
        kind => Expr::binary(left, op, Expr::new(kind, right.position), position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str) -> Expr {
        Expr::variable(name, Position::ZERO)
    }

    fn bin(left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::binary(left, op, right, Position::ZERO)
    }

    #[test]
    fn test_tighter_right_operand_is_grouped() {
        let naive = bin(bin(leaf("a"), BinaryOp::Add, leaf("b")), BinaryOp::Mul, leaf("c"));
        assert_eq!(reorder_by_precedence(naive).to_string(), "(a + (b * c))");
    }

    #[test]
    fn test_correct_tree_is_unchanged() {
        let tree = bin(bin(leaf("a"), BinaryOp::Mul, leaf("b")), BinaryOp::Add, leaf("c"));
        assert_eq!(reorder_by_precedence(tree.clone()), tree);
    }

    #[test]
    fn test_left_associative_chain_kept() {
        let tree = bin(bin(leaf("a"), BinaryOp::Sub, leaf("b")), BinaryOp::Sub, leaf("c"));
        assert_eq!(reorder_by_precedence(tree).to_string(), "((a - b) - c)");
    }

    #[test]
    fn test_non_associative_right_nesting_kept() {
        let tree = bin(leaf("a"), BinaryOp::Sub, bin(leaf("b"), BinaryOp::Sub, leaf("c")));
        assert_eq!(reorder_by_precedence(tree).to_string(), "(a - (b - c))");
    }

    #[test]
    fn test_associative_right_nesting_normalized() {
        let tree = bin(leaf("a"), BinaryOp::Mul, bin(leaf("b"), BinaryOp::Mul, leaf("c")));
        assert_eq!(reorder_by_precedence(tree).to_string(), "((a * b) * c)");
    }

    #[test]
    fn test_non_associative_child_not_regrouped() {
        let tree = bin(leaf("a"), BinaryOp::Mul, bin(leaf("b"), BinaryOp::Div, leaf("c")));
        assert_eq!(reorder_by_precedence(tree).to_string(), "(a * (b / c))");
    }
}
