//! Classification of diagnostics by the pipeline stage that found them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What category of problem a diagnostic reports.
///
/// The kinds follow the pipeline: lexing/parsing produce `Syntax`, include
/// handling produces `Include`, name lookup produces `Resolution`, generic
/// instantiation and tuple length checks produce `Arity`, structural
/// matching produces `Shape`, and numeric width checks produce `Range`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Malformed recipe or data text.
    Syntax,
    /// A missing or cyclic include.
    Include,
    /// An identifier that does not name any known type or variant.
    Resolution,
    /// Generic instantiation or tuple length mismatch.
    Arity,
    /// Missing field, unexpected field, wrong aggregate kind, or wrong
    /// variant payload shape.
    Shape,
    /// A numeric value outside a primitive's representable domain.
    Range,
    /// A failure in the artifact cache, reported as a warning.
    Cache,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Include => "include",
            DiagnosticKind::Resolution => "resolution",
            DiagnosticKind::Arity => "arity",
            DiagnosticKind::Shape => "shape",
            DiagnosticKind::Range => "range",
            DiagnosticKind::Cache => "cache",
        };
        write!(f, "{s}")
    }
}
