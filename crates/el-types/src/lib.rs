//! Shared types for the EL expression language.
//!
//! This crate defines the dynamic [`Value`] model, its conversions,
//! operators and indexing rules, the expression tree ([`ast`]), source
//! positions and the error type used by every evaluation stage.

mod convert;
mod error;
mod index;
mod ops;
mod position;
mod value;
pub mod ast;

pub use error::{ElError, ErrorKind};
pub use ops::{inclusive_range, inclusive_range_len};
pub use position::Position;
pub use value::{Value, ValueKind, ValueType};

/// Result type used throughout the EL crates.
pub type ElResult<T> = std::result::Result<T, ElError>;
