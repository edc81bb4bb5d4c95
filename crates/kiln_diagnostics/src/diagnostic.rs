//! Structured diagnostic messages with severity, kind, and source location.

use crate::kind::DiagnosticKind;
use crate::severity::Severity;
use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// A structured diagnostic message.
///
/// Diagnostics are the only way user-facing problems leave the pipeline.
/// Each carries a severity, a [`DiagnosticKind`] classifying the problem,
/// the message text, and the span of the offending source text (the dummy
/// span when no location applies, e.g. a missing include).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The problem category.
    pub kind: DiagnosticKind,
    /// The main diagnostic message.
    pub message: String,
    /// Where the problem was detected.
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            span,
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(DiagnosticKind::Syntax, "unexpected token", Span::DUMMY);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.kind, DiagnosticKind::Syntax);
        assert_eq!(diag.message, "unexpected token");
    }

    #[test]
    fn create_warning() {
        let diag = Diagnostic::warning(DiagnosticKind::Shape, "unused declaration", Span::DUMMY);
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::error(DiagnosticKind::Range, "value out of range", Span::DUMMY);
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "value out of range");
        assert_eq!(back.kind, DiagnosticKind::Range);
    }
}
