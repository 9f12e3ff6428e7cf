//! Unified error types for pattern compilation
//!
//! Every failure the compiler can produce is one of five distinct kinds,
//! detected before any array operation executes:
//!
//! - **`Syntax`**: malformed notation (missing separator, unbalanced
//!   parentheses, nested groups, ...)
//! - **`Rank`**: the array's rank is incompatible with the pattern
//! - **`ShapeMismatch`**: sizes don't line up (split not divisible,
//!   broadcast source not 1)
//! - **`AmbiguousSplit`**: more than one unresolved member in a group
//! - **`UnknownAxis`**: an output axis resolves to nothing
//!
//! # Examples
//!
//! ```
//! use rearrso_planner::{AxisHints, RearrangeError, RearrangePlan};
//!
//! let err = RearrangePlan::compile(&[12, 4], "(h1 h2) w -> h1 (h2 w)", &AxisHints::new())
//!     .unwrap_err();
//! assert!(matches!(err, RearrangeError::AmbiguousSplit { .. }));
//! ```

use thiserror::Error;

/// Top-level error type for pattern compilation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RearrangeError {
    /// Malformed pattern notation
    #[error("pattern syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Array rank incompatible with the pattern's explicit axes
    #[error("rank mismatch: pattern names {explicit} axes but array has rank {rank}")]
    Rank { explicit: usize, rank: usize },

    /// Sizes don't line up with the pattern
    #[error("shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatchError),

    /// More than one member of a composite group has no known size
    #[error("ambiguous split in '({group})': cannot infer sizes for {unresolved:?}")]
    AmbiguousSplit {
        group: String,
        unresolved: Vec<String>,
    },

    /// An output axis cannot be resolved from the input, hints, or ellipsis
    #[error("unknown axis '{name}' in output")]
    UnknownAxis { name: String },
}

/// Malformed-notation errors from the tokenizer and classifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("pattern must contain a '->' separator")]
    MissingSeparator,

    #[error("pattern contains more than one '->' separator")]
    MultipleSeparators,

    #[error("unbalanced parentheses in '{side}'")]
    UnbalancedParens { side: String },

    #[error("nested groups are not allowed in '{side}'")]
    NestedGroup { side: String },

    #[error("empty group '()' in pattern")]
    EmptyGroup,

    #[error("invalid axis name '{token}'")]
    InvalidName { token: String },

    #[error("at most one ellipsis is allowed per side")]
    MultipleEllipsis,

    #[error("duplicate axis '{name}' within one side of the pattern")]
    DuplicateAxis { name: String },

    #[error("axis '{name}' appears in the input but not in the output")]
    DanglingAxis { name: String },
}

/// Size-consistency errors from the resolver and plan builder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatchError {
    #[error("cannot split dimension of size {size} by '({group})' with known product {known}")]
    SplitIndivisible {
        group: String,
        size: usize,
        known: usize,
    },

    #[error("broadcast source for axis '{axis}' has size {size}, expected 1")]
    BroadcastSource { axis: String, size: usize },

    #[error("a pattern cannot both merge axes and introduce broadcast axes")]
    BroadcastWithMerge,
}

impl RearrangeError {
    /// Create an unknown-axis error
    pub fn unknown_axis(name: impl Into<String>) -> Self {
        RearrangeError::UnknownAxis { name: name.into() }
    }

    /// Create a dangling-axis error
    pub fn dangling_axis(name: impl Into<String>) -> Self {
        RearrangeError::Syntax(SyntaxError::DanglingAxis { name: name.into() })
    }
}
