use crate::{Position, ValueType};
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of an [`ElError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conversion,
    Dereference,
    Evaluation,
    Index,
    IndexOutOfBounds,
}

/// An error raised while converting, indexing or evaluating values.
///
/// Values and indices are captured in their described (human-readable) form
/// so an error never keeps the offending value alive. The position is the
/// source location of the innermost expression node that raised the error,
/// or `None` when the error came from a bare value operation.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElError {
    /// The requested conversion is not representable for this value.
    #[error("cannot convert value '{value}' of type '{from}' to type '{to}'")]
    Conversion {
        value: String,
        from: ValueType,
        to: ValueType,
        position: Option<Position>,
    },

    /// A payload accessor was used on a value of the wrong type.
    #[error("cannot dereference value '{value}' of type '{from}' as type '{to}'")]
    Dereference {
        value: String,
        from: ValueType,
        to: ValueType,
        position: Option<Position>,
    },

    /// General evaluation failure.
    #[error("{message}")]
    Evaluation {
        message: String,
        position: Option<Position>,
    },

    /// Indexing a non-indexable value, or a missing map key.
    #[error("cannot index value '{indexable}' with index '{index}'")]
    Index {
        indexable: String,
        index: String,
        position: Option<Position>,
    },

    /// A well-typed index that points outside the indexed value.
    #[error("index '{index}' is out of bounds for value '{indexable}'")]
    IndexOutOfBounds {
        indexable: String,
        index: String,
        position: Option<Position>,
    },
}

impl ElError {
    pub fn conversion(value: impl Into<String>, from: ValueType, to: ValueType) -> Self {
        Self::Conversion {
            value: value.into(),
            from,
            to,
            position: None,
        }
    }

    pub fn dereference(value: impl Into<String>, from: ValueType, to: ValueType) -> Self {
        Self::Dereference {
            value: value.into(),
            from,
            to,
            position: None,
        }
    }

    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
            position: None,
        }
    }

    pub fn index(indexable: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Index {
            indexable: indexable.into(),
            index: index.into(),
            position: None,
        }
    }

    pub fn index_out_of_bounds(indexable: impl Into<String>, index: impl Into<String>) -> Self {
        Self::IndexOutOfBounds {
            indexable: indexable.into(),
            index: index.into(),
            position: None,
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Conversion { .. } => ErrorKind::Conversion,
            Self::Dereference { .. } => ErrorKind::Dereference,
            Self::Evaluation { .. } => ErrorKind::Evaluation,
            Self::Index { .. } => ErrorKind::Index,
            Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
        }
    }

    /// True for index errors, including out-of-bounds errors.
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::Index { .. } | Self::IndexOutOfBounds { .. })
    }

    /// True for evaluation errors, including all index errors.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Self::Evaluation { .. }) || self.is_index_error()
    }

    /// The source position the error was raised at, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Conversion { position, .. }
            | Self::Dereference { position, .. }
            | Self::Evaluation { position, .. }
            | Self::Index { position, .. }
            | Self::IndexOutOfBounds { position, .. } => *position,
        }
    }

    /// Tag the error with a source position unless it already carries one.
    /// Unknown positions are ignored.
    pub fn at(mut self, at: Position) -> Self {
        if !at.is_known() {
            return self;
        }
        match &mut self {
            Self::Conversion { position, .. }
            | Self::Dereference { position, .. }
            | Self::Evaluation { position, .. }
            | Self::Index { position, .. }
            | Self::IndexOutOfBounds { position, .. } => {
                position.get_or_insert(at);
            }
        }
        self
    }

    /// Turn a conversion failure into an evaluation failure with the given
    /// message. Other errors pass through unchanged.
    pub fn into_evaluation(self, message: impl Into<String>) -> Self {
        match self {
            Self::Conversion { position, .. } | Self::Dereference { position, .. } => {
                Self::Evaluation {
                    message: message.into(),
                    position,
                }
            }
            other => other,
        }
    }
}
