//! Validation Engine
//!
//! Schema comparison and the diagnostics it reports.

pub mod diagnostics;
pub mod engine;

pub use diagnostics::{
    Diagnostic, DiagnosticCollector, DiagnosticKind, DiagnosticSink, LogSink, NullSink, Severity,
};
pub use engine::{Comparator, Validator};
