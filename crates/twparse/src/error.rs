//! Error types for utility string parsing.
//!
//! Parsing itself never fails: unterminated brackets and groups produce
//! nodes marked as unclosed. The only fallible step is validating the
//! configured separator before a parser is built.

use thiserror::Error;

/// Errors that can occur when configuring the parser.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The separator is the empty string.
    #[error("separator must not be empty")]
    EmptySeparator,

    /// The separator contains whitespace or one of `()[]{}/!-`.
    #[error("invalid separator {0:?}: must not contain whitespace or any of ()[]{{}}/!-")]
    InvalidSeparator(String),
}
