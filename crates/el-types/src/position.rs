use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a value or expression node.
///
/// Line and column are 1-based when they come from a parser. Values built
/// programmatically sit at [`Position::ZERO`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The position of programmatically constructed values.
    pub const ZERO: Position = Position { line: 0, column: 0 };

    /// Create a new position.
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Whether this position points into real source text.
    pub fn is_known(self) -> bool {
        self != Self::ZERO
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_default_is_zero() {
        assert_eq!(Position::default(), Position::ZERO);
        assert!(!Position::ZERO.is_known());
    }

    #[test]
    fn test_position_known() {
        let p = Position::new(3, 7);
        assert!(p.is_known());
        assert_eq!(p.line, 3);
        assert_eq!(p.column, 7);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(format!("{}", Position::new(3, 7)), "3:7");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_position_json_field_names() {
        let json = serde_json::to_string(&Position::new(4, 2)).unwrap();
        assert_eq!(json, r#"{"line":4,"column":2}"#);
    }
}
