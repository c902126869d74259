//! Error types.
//!
//! [`ColumnError::Unreachable`] is an expected outcome: the cursor has still
//! been moved to the closest reachable position and the caller decides
//! whether that is worth reporting. The other variants mean the text could
//! not be changed as requested; the line is left untouched.

use thiserror::Error;

/// Failure of a column advance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("column {target} is not reachable on line {line} (stopped at column {reached})")]
    Unreachable {
        line: usize,
        target: usize,
        reached: usize,
    },

    #[error("out of memory while rewriting line {line} ({bytes} bytes)")]
    Allocation { line: usize, bytes: usize },

    #[error("cannot fill {gap} columns inside a {width}-column character on line {line}")]
    InvalidWidthCorrection {
        line: usize,
        gap: usize,
        width: usize,
    },

    #[error("line {line} does not exist")]
    MissingLine { line: usize },
}

impl ColumnError {
    /// True for the recoverable "could not get there" outcome.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// Failure to apply a `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("option is not a toggle: {0}")]
    NotBoolean(String),

    #[error("number required after =: {name}={value}")]
    InvalidNumber { name: String, value: String },

    #[error("invalid argument: {name}={value}")]
    InvalidValue { name: String, value: String },
}
