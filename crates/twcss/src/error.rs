//! Error types for registry construction and utility compilation.
//!
//! Evaluation problems are collected as [`Diagnostic`]s. In silent mode the
//! evaluator drops them after logging; with `throw_error` enabled they are
//! returned to the caller inside [`TwError::Compile`].

use std::fmt;

use thiserror::Error;
use twparse::{ParseError, Span};

/// Errors surfaced by this crate.
#[derive(Error, Debug)]
pub enum TwError {
    /// The configured separator is not usable.
    #[error("invalid separator: {0}")]
    Parse(#[from] ParseError),

    /// A static utility or variant was registered twice under the same key
    /// while strict mode was on.
    #[error("duplicate {table} registration: {key}")]
    DuplicateRegistration { table: &'static str, key: String },

    /// Compiling a utility string produced diagnostics in strict mode.
    #[error("failed to compile `{input}`: {}", join_diagnostics(.diagnostics))]
    Compile {
        input: String,
        diagnostics: Vec<Diagnostic>,
    },

    /// A configuration document has an unsupported shape.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A configuration document is not valid JSON.
    #[error("config JSON error")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TwError>;

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What went wrong with one node of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An unterminated bracket, group or modifier.
    ParseIncomplete,
    /// No utility spec matches a classname.
    UtilityNotFound,
    /// No variant spec matches a variant.
    VariantNotFound,
    /// More than one spec produced a result for the same input.
    AmbiguousMatch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::ParseIncomplete => "unterminated input",
            DiagnosticKind::UtilityNotFound => "unknown utility",
            DiagnosticKind::VariantNotFound => "unknown variant",
            DiagnosticKind::AmbiguousMatch => "ambiguous utility",
        };
        f.write_str(name)
    }
}

/// A problem found while evaluating one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Byte range of the offending node in the input.
    pub span: Span,
    /// The offending node's source text.
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` at {}", self.kind, self.text, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_lists_every_diagnostic() {
        let err = TwError::Compile {
            input: "foo hover:bar".into(),
            diagnostics: vec![
                Diagnostic {
                    kind: DiagnosticKind::UtilityNotFound,
                    span: Span::new(0, 3),
                    text: "foo".into(),
                },
                Diagnostic {
                    kind: DiagnosticKind::UtilityNotFound,
                    span: Span::new(10, 13),
                    text: "bar".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "failed to compile `foo hover:bar`: unknown utility `foo` at 0..3; unknown utility `bar` at 10..13"
        );
    }
}
