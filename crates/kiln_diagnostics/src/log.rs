//! Accumulator for the diagnostics of one compile attempt.

use crate::diagnostic::Diagnostic;
use crate::kind::DiagnosticKind;
use crate::severity::Severity;
use kiln_source::{SourceDb, Span};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// An accumulator for the diagnostics of one compile attempt.
///
/// The log is owned by the caller of `compile` and filled by every pipeline
/// stage through a shared reference. The error count is tracked atomically
/// so `good()` never locks the message vector. A compile produces a binary
/// artifact if and only if `good()` is true at the end.
pub struct Log {
    messages: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl Log {
    /// Creates a new empty log.
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Emits a diagnostic into the log.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity == Severity::Error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let mut messages = self.messages.lock().unwrap();
        messages.push(diag);
    }

    /// Emits an error with the given kind, message, and location.
    pub fn error(&self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(kind, message, span));
    }

    /// Emits a warning with the given kind, message, and location.
    pub fn warning(&self, kind: DiagnosticKind, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(kind, message, span));
    }

    /// Returns the number of error-severity diagnostics emitted so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the total number of diagnostics (errors and warnings).
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Returns `true` if no diagnostics have been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the log has no errors. Warnings do not count.
    pub fn good(&self) -> bool {
        self.error_count() == 0
    }

    /// Removes all diagnostics and resets the error count.
    pub fn clear(&self) {
        let mut messages = self.messages.lock().unwrap();
        messages.clear();
        self.error_count.store(0, Ordering::Relaxed);
    }

    /// Returns a snapshot of all diagnostics in insertion order.
    pub fn messages(&self) -> Vec<Diagnostic> {
        self.messages.lock().unwrap().clone()
    }

    /// Renders all diagnostics, newline-joined in insertion order.
    ///
    /// Each line reads `severity[kind]: message`, suffixed with
    /// `name:line:col` when the diagnostic has a real source location.
    pub fn render(&self, source_db: &SourceDb) -> String {
        let messages = self.messages.lock().unwrap();
        let mut out = String::new();
        for (i, diag) in messages.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!(
                "{}[{}]: {}",
                diag.severity, diag.kind, diag.message
            ));
            if !diag.span.is_dummy() {
                let resolved = source_db.resolve_span(diag.span);
                out.push_str(&format!(" ({resolved})"));
            }
        }
        out
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}
