//! Errors the match engine refuses to compile past.
//!
//! Non-exhaustive matches and unreachable arms are not errors; they are
//! ordinary results (see [`crate::check`]).

use ori_match_ir::{Name, ShapeId};

/// A malformed arm list.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// A pattern does not fit its shape. Front-end bug.
    #[error("arm {arm_index}: {kind}")]
    ShapeMismatch { arm_index: usize, kind: ShapeMismatch },
    /// Alternatives of an or-pattern bind different names.
    #[error("arm {arm_index}: or-pattern alternatives bind different names ({first:?} vs {other:?})")]
    InconsistentOrBindings {
        arm_index: usize,
        /// Names bound by the first alternative, sorted.
        first: Vec<Name>,
        /// Names bound by the first alternative that disagrees, sorted.
        other: Vec<Name>,
    },
    /// A pattern binds the same name twice.
    #[error("arm {arm_index}: {name:?} is bound more than once")]
    DuplicateBinding { arm_index: usize, name: Name },
    /// The scrutinee shape id does not belong to the registry.
    #[error("shape {0:?} is not part of the registry")]
    UnknownShape(ShapeId),
}

/// Why a pattern does not fit its shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("tag {tag:?} is not a variant of shape {shape:?}")]
    UnknownTag { shape: ShapeId, tag: Name },
    #[error("variant {tag:?} has {expected} fields, pattern has {found}")]
    VariantArity {
        tag: Name,
        expected: usize,
        found: usize,
    },
    #[error("tuple shape has {expected} fields, pattern has {found}")]
    TupleArity { expected: usize, found: usize },
    #[error("sequence shape has exactly {expected} elements, pattern needs {found}")]
    SequenceLength { expected: u32, found: usize },
    #[error("{pattern} pattern cannot match a {shape} shape")]
    PatternKind {
        pattern: &'static str,
        shape: &'static str,
    },
    #[error("or-pattern has no alternatives")]
    EmptyOr,
}
