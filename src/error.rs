//! Error taxonomy shared by every parser, generator, and builder in the crate.

use thiserror::Error;

/// A single failure encountered while lexing, parsing, validating, or
/// generating a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid value at {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("{path} exceeds maximum length {max} (got {actual})")]
    LengthViolation {
        path: String,
        max: usize,
        actual: usize,
    },

    #[error("inconsistent document: {0}")]
    Inconsistency(String),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("unknown or unsupported version: {0}")]
    UnknownVersion(String),

    #[error("unsupported combination of type {mtype} and version {version}")]
    UnsupportedCombination { mtype: String, version: String },
}

impl ParseError {
    pub fn invalid_value(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn length_violation(path: impl Into<String>, max: usize, actual: usize) -> Self {
        ParseError::LengthViolation {
            path: path.into(),
            max,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Accumulates every violation found while parsing or validating a document
/// instead of failing on the first one. An envelope that cannot be lexed at
/// all returns a single `Err`; a well-formed envelope with field-level
/// problems collects all of them here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ParseError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> std::result::Result<(), ValidationReport> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// A non-fatal observation surfaced through the optional diagnostic sink
/// rather than through `ParseError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The currency mark on a `:61:` statement line differs from the
    /// statement's own balance currency. The line's mark is kept but the
    /// mismatch is surfaced so a caller can decide how to react.
    StatementLineCurrencyMismatch {
        line_currency_mark: char,
        statement_currency: String,
    },
    /// A builder produced a document with zero transactions/entries.
    EmptyDocument { document_kind: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::StatementLineCurrencyMismatch {
                line_currency_mark,
                statement_currency,
            } => write!(
                f,
                "statement line currency mark '{line_currency_mark}' differs from statement currency {statement_currency}"
            ),
            Diagnostic::EmptyDocument { document_kind } => {
                write!(f, "{document_kind} has no transactions or entries")
            }
        }
    }
}

/// Callback invoked for non-fatal diagnostics. The core never logs on its
/// own; callers that want visibility pass a sink.
pub type DiagnosticSink<'a> = Option<&'a mut dyn FnMut(Diagnostic)>;

pub(crate) fn emit(sink: &mut DiagnosticSink<'_>, diagnostic: Diagnostic) {
    if let Some(f) = sink.as_mut() {
        f(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_report_accumulates_all_errors() {
        let mut report = ValidationReport::new();
        report.push(ParseError::MissingField(":20:".into()));
        report.push(ParseError::invalid_value(":32A:", "bad date"));
        assert_eq!(report.errors.len(), 2);
        assert!(report.into_result().is_err());
    }

    #[test]
    fn empty_report_is_ok() {
        assert!(ValidationReport::new().into_result().is_ok());
    }
}
