//! Expression tree for the EL language.
//!
//! Every node carries a [`Position`] for error reporting. Trees are built
//! bottom-up through the factory functions on [`Expr`]; a parser for the
//! surface syntax is expected to call them in source order and leave
//! operator precedence to the reordering pass in `el-eval`.

use crate::{Position, Value};
use std::fmt;

/// Name of the implicit variable bound to the last valid index while a
/// subscript is evaluated. Open-ended ranges (`[a..]`, `[..b]`) refer to it.
pub const AUTO_RANGE_PARAMETER: &str = "__AutoRangeParameter";

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `!x`
    Not,
    /// `(x)`
    Group,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Less,
    LessEq,
    Eq,
    NotEq,
    GreaterEq,
    Greater,
    Range,
}

/// Static properties of a binary operator used to restore precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorTraits {
    /// Higher binds tighter.
    pub precedence: u8,
    /// `(a op b) op c == a op (b op c)`
    pub associative: bool,
    /// `a op b == b op a`
    pub commutative: bool,
}

impl OperatorTraits {
    const fn new(precedence: u8, associative: bool, commutative: bool) -> Self {
        Self {
            precedence,
            associative,
            commutative,
        }
    }
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 14] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Less,
        BinaryOp::LessEq,
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::GreaterEq,
        BinaryOp::Greater,
        BinaryOp::Range,
    ];

    /// Source symbol of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Greater => ">",
            BinaryOp::Range => "..",
        }
    }

    pub fn traits(self) -> OperatorTraits {
        match self {
            BinaryOp::Range => OperatorTraits::new(1, false, false),
            BinaryOp::Or => OperatorTraits::new(2, true, true),
            BinaryOp::And => OperatorTraits::new(3, true, true),
            BinaryOp::Eq | BinaryOp::NotEq => OperatorTraits::new(4, false, true),
            BinaryOp::Less | BinaryOp::LessEq | BinaryOp::GreaterEq | BinaryOp::Greater => {
                OperatorTraits::new(5, false, false)
            }
            BinaryOp::Add => OperatorTraits::new(6, true, false),
            BinaryOp::Sub => OperatorTraits::new(6, false, false),
            BinaryOp::Mul => OperatorTraits::new(7, true, true),
            BinaryOp::Div | BinaryOp::Mod => OperatorTraits::new(7, false, false),
        }
    }

    pub fn precedence(self) -> u8 {
        self.traits().precedence
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::Group => "()",
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A positioned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A constant value.
    Literal(Value),
    /// A named variable, resolved against the environment at evaluation.
    Variable(String),
    /// `[a, b, c]`
    Array(Vec<Expr>),
    /// `{"k": v, ...}`, in source order. Later duplicates win.
    Map(Vec<(String, Expr)>),
    /// `op operand`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `indexable[index]`
    Subscript {
        indexable: Box<Expr>,
        index: Box<Expr>,
    },
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// A literal. The value is tagged with the node's position.
    pub fn literal(value: impl Into<Value>, position: Position) -> Self {
        Self::new(
            ExprKind::Literal(value.into().with_position(position)),
            position,
        )
    }

    pub fn variable(name: impl Into<String>, position: Position) -> Self {
        Self::new(ExprKind::Variable(name.into()), position)
    }

    pub fn array(elements: Vec<Expr>, position: Position) -> Self {
        Self::new(ExprKind::Array(elements), position)
    }

    pub fn map<K: Into<String>>(entries: Vec<(K, Expr)>, position: Position) -> Self {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self::new(ExprKind::Map(entries), position)
    }

    pub fn unary(op: UnaryOp, operand: Expr, position: Position) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            position,
        )
    }

    pub fn unary_plus(operand: Expr, position: Position) -> Self {
        Self::unary(UnaryOp::Plus, operand, position)
    }

    pub fn unary_minus(operand: Expr, position: Position) -> Self {
        Self::unary(UnaryOp::Minus, operand, position)
    }

    pub fn negation(operand: Expr, position: Position) -> Self {
        Self::unary(UnaryOp::Not, operand, position)
    }

    /// A parenthesized sub-expression. Groups are never split by the
    /// precedence pass.
    pub fn group(operand: Expr, position: Position) -> Self {
        Self::unary(UnaryOp::Group, operand, position)
    }

    pub fn subscript(indexable: Expr, index: Expr, position: Position) -> Self {
        Self::new(
            ExprKind::Subscript {
                indexable: Box::new(indexable),
                index: Box::new(index),
            },
            position,
        )
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr, position: Position) -> Self {
        Self::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            position,
        )
    }

    pub fn add(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Add, right, position)
    }

    pub fn sub(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Sub, right, position)
    }

    pub fn mul(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Mul, right, position)
    }

    pub fn div(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Div, right, position)
    }

    pub fn modulo(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Mod, right, position)
    }

    pub fn and(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::And, right, position)
    }

    pub fn or(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Or, right, position)
    }

    pub fn less(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Less, right, position)
    }

    pub fn less_eq(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::LessEq, right, position)
    }

    pub fn eq(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Eq, right, position)
    }

    pub fn not_eq(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::NotEq, right, position)
    }

    pub fn greater_eq(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::GreaterEq, right, position)
    }

    pub fn greater(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Greater, right, position)
    }

    pub fn range(left: Expr, right: Expr, position: Position) -> Self {
        Self::binary(left, BinaryOp::Range, right, position)
    }

    /// `left..`: a range up to the last index of the enclosing subscript.
    pub fn auto_range_from(left: Expr, position: Position) -> Self {
        let upper = Self::variable(AUTO_RANGE_PARAMETER, position);
        Self::range(left, upper, position)
    }

    /// `..right`: a range from the last index of the enclosing subscript.
    pub fn auto_range_to(right: Expr, position: Position) -> Self {
        let lower = Self::variable(AUTO_RANGE_PARAMETER, position);
        Self::range(lower, right, position)
    }

    /// Whether this node is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    /// The operator of a binary node.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self.kind {
            ExprKind::Binary { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Variable(_) => Vec::new(),
            ExprKind::Array(elements) => elements.iter().collect(),
            ExprKind::Map(entries) => entries.iter().map(|(_, v)| v).collect(),
            ExprKind::Unary { operand, .. } => vec![operand.as_ref()],
            ExprKind::Subscript { indexable, index } => vec![indexable.as_ref(), index.as_ref()],
            ExprKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Whether any node in this tree is a variable reference.
    pub fn has_variables(&self) -> bool {
        matches!(self.kind, ExprKind::Variable(_))
            || self.children().into_iter().any(Expr::has_variables)
    }
}

/// Renders the tree with every binary node parenthesized, so the shape of
/// the tree is visible in the output.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(value) => write!(f, "{value}"),
            ExprKind::Variable(name) => f.write_str(name),
            ExprKind::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            ExprKind::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {value}", Value::from(key.as_str()))?;
                }
                f.write_str("}")
            }
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Group => write!(f, "({operand})"),
                _ => write!(f, "{op}{operand}"),
            },
            ExprKind::Subscript { indexable, index } => write!(f, "{indexable}[{index}]"),
            ExprKind::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(column: u32) -> Position {
        Position::new(1, column)
    }

    fn num(n: i32) -> Expr {
        Expr::literal(n, Position::ZERO)
    }

    #[test]
    fn test_operator_traits() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Less.precedence());
        assert!(BinaryOp::Less.precedence() > BinaryOp::Eq.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Or.precedence() > BinaryOp::Range.precedence());
        assert!(BinaryOp::Add.traits().associative);
        assert!(!BinaryOp::Add.traits().commutative);
        assert!(!BinaryOp::Sub.traits().associative);
        assert!(BinaryOp::Eq.traits().commutative);
    }

    #[test]
    fn test_symbols_are_distinct() {
        let mut symbols: Vec<_> = BinaryOp::ALL.iter().map(|op| op.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), BinaryOp::ALL.len());
    }

    #[test]
    fn test_literal_tags_value_position() {
        let e = Expr::literal(3, p(7));
        match &e.kind {
            ExprKind::Literal(v) => assert_eq!(v.position(), p(7)),
            other => panic!("expected literal, got {other:?}"),
        }
        assert!(e.is_literal());
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        let e = Expr::add(num(3), Expr::mul(num(4), num(2), p(2)), p(1));
        assert_eq!(e.to_string(), "(3 + (4 * 2))");
        let g = Expr::negation(Expr::group(Expr::variable("x", p(1)), p(1)), p(1));
        assert_eq!(g.to_string(), "!(x)");
        let s = Expr::subscript(
            Expr::array(vec![num(1), num(2)], p(1)),
            Expr::unary_minus(num(1), p(1)),
            p(1),
        );
        assert_eq!(s.to_string(), "[1, 2][-1]");
        let m = Expr::map(vec![("a", num(1))], p(1));
        assert_eq!(m.to_string(), "{\"a\": 1}");
    }

    #[test]
    fn test_auto_range_shapes() {
        let from = Expr::auto_range_from(num(1), p(3));
        assert_eq!(from.binary_op(), Some(BinaryOp::Range));
        assert_eq!(from.to_string(), format!("(1 .. {AUTO_RANGE_PARAMETER})"));
        let to = Expr::auto_range_to(num(0), p(3));
        assert_eq!(to.to_string(), format!("({AUTO_RANGE_PARAMETER} .. 0)"));
        assert!(to.has_variables());
    }

    #[test]
    fn test_children_and_variables() {
        let e = Expr::subscript(Expr::variable("a", p(1)), num(0), p(2));
        assert_eq!(e.children().len(), 2);
        assert!(e.has_variables());
        assert!(!Expr::add(num(1), num(2), p(1)).has_variables());
        assert!(num(1).children().is_empty());
        assert_eq!(num(1).binary_op(), None);
    }
}
