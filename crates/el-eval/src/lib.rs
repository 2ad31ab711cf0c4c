//! EL tree-walking evaluator.
//!
//! Takes expression trees built with the factories in [`el_types::ast`],
//! restores operator precedence, optionally folds constants, and evaluates
//! them against a caller-supplied [`Environment`].
//!
//! ```
//! use el_eval::{EvaluationContext, Environment, Expression};
//! use el_types::ast::Expr;
//! use el_types::{Position, Value};
//!
//! let at = Position::ZERO;
//! // `x + 4 * 2`, as a left-to-right parser would build it.
//! let naive = Expr::mul(
//!     Expr::add(Expr::variable("x", at), Expr::literal(4, at), at),
//!     Expr::literal(2, at),
//!     at,
//! );
//! let expr = Expression::new(naive);
//!
//! let mut ctx = EvaluationContext::new();
//! ctx.declare_variable("x", Value::from(3)).unwrap();
//! assert_eq!(expr.evaluate(&ctx).unwrap(), Value::from(11));
//! ```

mod config;
mod env;
mod evaluator;
mod expression;
mod optimize;
mod reorder;

pub use config::EvalConfig;
pub use env::{Environment, EvaluationContext, EvaluationStack, VariableStore, VariableTable};
pub use evaluator::Evaluator;
pub use expression::Expression;
pub use reorder::reorder_by_precedence;
