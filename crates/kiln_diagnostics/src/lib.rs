//! Diagnostics for the Kiln data compiler.
//!
//! Compile problems are reported as structured [`Diagnostic`] values
//! accumulated in a [`Log`]. A compile produces a binary artifact if and
//! only if its log has zero errors; warnings never block artifact
//! production.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod kind;
pub mod log;
pub mod severity;

pub use diagnostic::Diagnostic;
pub use kind::DiagnosticKind;
pub use log::Log;
pub use severity::Severity;
