//! Integration tests for precedence restoration.
//!
//! Trees are built the way a left-to-right parser without precedence
//! climbing would build them, then compared structurally after reordering.

use el_eval::reorder_by_precedence;
use el_types::ast::{BinaryOp, Expr};
use el_types::Position;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn at(column: u32) -> Position {
    Position::new(1, column)
}

fn num(n: i32, column: u32) -> Expr {
    Expr::literal(n, at(column))
}

fn var(name: &str, column: u32) -> Expr {
    Expr::variable(name, at(column))
}

/// Fold `first (op operand)*` left to right, ignoring precedence.
fn naive(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |acc, (op, operand)| {
        let position = operand.position;
        Expr::binary(acc, op, operand, position)
    })
}

// ══════════════════════════════════════════════════════════════════════════════
// Rotations
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn multiplication_after_addition() {
    // 3 + 4 * 2
    let tree = naive(num(3, 1), vec![(BinaryOp::Add, num(4, 5)), (BinaryOp::Mul, num(2, 9))]);
    let expected = Expr::binary(
        num(3, 1),
        BinaryOp::Add,
        Expr::binary(num(4, 5), BinaryOp::Mul, num(2, 9), at(9)),
        at(5),
    );
    assert_eq!(reorder_by_precedence(tree), expected);
}

#[test]
fn rotation_keeps_operator_positions() {
    // a < b + c
    let tree = naive(
        var("a", 1),
        vec![(BinaryOp::Less, var("b", 5)), (BinaryOp::Add, var("c", 9))],
    );
    let reordered = reorder_by_precedence(tree);
    assert_eq!(reordered.position, at(5));
    assert_eq!(reordered.binary_op(), Some(BinaryOp::Less));
    let right = reordered.children()[1];
    assert_eq!(right.position, at(9));
    assert_eq!(right.binary_op(), Some(BinaryOp::Add));
}

#[test]
fn mixed_chain() {
    // a * b + c * d - e / f
    let tree = naive(
        var("a", 1),
        vec![
            (BinaryOp::Mul, var("b", 3)),
            (BinaryOp::Add, var("c", 5)),
            (BinaryOp::Mul, var("d", 7)),
            (BinaryOp::Sub, var("e", 9)),
            (BinaryOp::Div, var("f", 11)),
        ],
    );
    assert_eq!(
        reorder_by_precedence(tree).to_string(),
        "(((a * b) + (c * d)) - (e / f))"
    );
}

#[test]
fn logical_chain() {
    // a || b && c == d
    let tree = naive(
        var("a", 1),
        vec![
            (BinaryOp::Or, var("b", 3)),
            (BinaryOp::And, var("c", 5)),
            (BinaryOp::Eq, var("d", 7)),
        ],
    );
    assert_eq!(
        reorder_by_precedence(tree).to_string(),
        "(a || (b && (c == d)))"
    );
}

#[test]
fn range_of_sums() {
    // a + 1 .. b - 1
    let tree = naive(
        var("a", 1),
        vec![
            (BinaryOp::Add, num(1, 3)),
            (BinaryOp::Range, var("b", 5)),
            (BinaryOp::Sub, num(1, 7)),
        ],
    );
    assert_eq!(
        reorder_by_precedence(tree).to_string(),
        "((a + 1) .. (b - 1))"
    );
}

#[test]
fn comparisons_stay_left_nested() {
    // a < b < c
    let tree = naive(
        var("a", 1),
        vec![(BinaryOp::Less, var("b", 3)), (BinaryOp::Less, var("c", 5))],
    );
    assert_eq!(reorder_by_precedence(tree).to_string(), "((a < b) < c)");
}

// ══════════════════════════════════════════════════════════════════════════════
// Barriers
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn group_is_not_split() {
    // (a + b) * c
    let group = Expr::group(Expr::add(var("a", 2), var("b", 4), at(4)), at(1));
    let tree = Expr::mul(group, var("c", 9), at(9));
    assert_eq!(reorder_by_precedence(tree.clone()), tree);
}

#[test]
fn reorders_inside_group() {
    // (a + b * c)
    let inner = naive(
        var("a", 2),
        vec![(BinaryOp::Add, var("b", 4)), (BinaryOp::Mul, var("c", 6))],
    );
    let tree = Expr::group(inner, at(1));
    assert_eq!(reorder_by_precedence(tree).to_string(), "((a + (b * c)))");
}

#[test]
fn reorders_inside_subscripts_and_constructors() {
    // [a + b * c][i - 1 * 2]
    let element = naive(
        var("a", 2),
        vec![(BinaryOp::Add, var("b", 4)), (BinaryOp::Mul, var("c", 6))],
    );
    let index = naive(var("i", 9), vec![(BinaryOp::Sub, num(1, 11)), (BinaryOp::Mul, num(2, 13))]);
    let tree = Expr::subscript(Expr::array(vec![element], at(1)), index, at(8));
    assert_eq!(
        reorder_by_precedence(tree).to_string(),
        "[(a + (b * c))][(i - (1 * 2))]"
    );
}

#[test]
fn reorders_map_values() {
    let value = naive(num(1, 7), vec![(BinaryOp::Eq, num(1, 12)), (BinaryOp::Add, num(0, 16))]);
    let tree = Expr::map(vec![("k", value)], at(1));
    assert_eq!(
        reorder_by_precedence(tree).to_string(),
        "{\"k\": (1 == (1 + 0))}"
    );
}

#[test]
fn unary_operand_is_a_barrier() {
    // -(a + b) * c, with the negation wrapping the sum
    let tree = Expr::mul(
        Expr::unary_minus(Expr::add(var("a", 2), var("b", 4), at(3)), at(1)),
        var("c", 8),
        at(7),
    );
    assert_eq!(reorder_by_precedence(tree.clone()), tree);
}
