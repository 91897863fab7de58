//! Diagnostics
//!
//! Every violation found during a comparison becomes one [`Diagnostic`],
//! delivered to a caller-owned [`DiagnosticSink`].

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Every kind of violation the engine and the audit library report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No accepted selector variant matched the input
    InvalidSelectorType,
    /// Dynamic selector declares a target type the schema does not allow
    InvalidTargetType,
    /// Input key is not declared and no placeholder absorbs it
    UnexpectedParameter,
    /// Key repeated although the schema value forbids multiples
    OnlyOneAllowed,
    /// Compared nodes have incompatible structure
    IncompatibleStructure,
    /// Structured tags are not equal
    TagMismatch,
    /// An audit was given a node kind it cannot judge
    Incompatible,
    InvalidBoolean,
    OutOfRange,
    InvalidRangeSyntax,
    InvalidValue,
    /// Value not in the allow-list, accepted because the audit is lenient
    InvalidValueLenient,
    CannotNegate,
    MixedNegation,
    TooManyNonNegated,
    TypeMismatch,
}

impl DiagnosticKind {
    /// Stable machine-readable code
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::InvalidSelectorType => "invalid_selector_type",
            DiagnosticKind::InvalidTargetType => "invalid_target_type",
            DiagnosticKind::UnexpectedParameter => "unexpected_parameter",
            DiagnosticKind::OnlyOneAllowed => "only_one_allowed",
            DiagnosticKind::IncompatibleStructure => "incompatible_structure",
            DiagnosticKind::TagMismatch => "tag_mismatch",
            DiagnosticKind::Incompatible => "incompatible",
            DiagnosticKind::InvalidBoolean => "invalid_boolean",
            DiagnosticKind::OutOfRange => "out_of_range",
            DiagnosticKind::InvalidRangeSyntax => "invalid_range_syntax",
            DiagnosticKind::InvalidValue => "invalid_value",
            DiagnosticKind::InvalidValueLenient => "invalid_value_lenient",
            DiagnosticKind::CannotNegate => "cannot_negate",
            DiagnosticKind::MixedNegation => "mixed_negation",
            DiagnosticKind::TooManyNonNegated => "too_many_non_negated",
            DiagnosticKind::TypeMismatch => "type_mismatch",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::InvalidValueLenient => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DiagnosticKind::InvalidSelectorType => "selector type is not accepted here",
            DiagnosticKind::InvalidTargetType => "target type is not allowed",
            DiagnosticKind::UnexpectedParameter => "unexpected parameter",
            DiagnosticKind::OnlyOneAllowed => "only one value is allowed for this parameter",
            DiagnosticKind::IncompatibleStructure => "structure does not match the expected kind",
            DiagnosticKind::TagMismatch => "structured tag does not match",
            DiagnosticKind::Incompatible => "input is incompatible with this audit",
            DiagnosticKind::InvalidBoolean => "value must be 'true' or 'false'",
            DiagnosticKind::OutOfRange => "value is out of range",
            DiagnosticKind::InvalidRangeSyntax => "invalid range syntax",
            DiagnosticKind::InvalidValue => "value is not allowed",
            DiagnosticKind::InvalidValueLenient => "value is not recognised",
            DiagnosticKind::CannotNegate => "value cannot be negated",
            DiagnosticKind::MixedNegation => "negated and non-negated values cannot be mixed",
            DiagnosticKind::TooManyNonNegated => "only one non-negated value is allowed",
            DiagnosticKind::TypeMismatch => "value type does not match",
        };
        f.write_str(message)
    }
}

/// A single violation found during a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Description of the emitting audit; `None` for engine checks
    pub audit: Option<String>,
    /// Input node, rendered in selector syntax
    pub input: String,
    /// Expected node, rendered in selector syntax
    pub expected: String,
    pub detail: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, input: String, expected: String) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            audit: None,
            input,
            expected,
            detail: None,
        }
    }

    pub fn with_audit(mut self, audit: String) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.kind, self.input)?;
        if let Some(audit) = &self.audit {
            write!(f, " [{}]", audit)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Receives diagnostics as they are found
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => log::warn!("{}", diagnostic),
            Severity::Warning | Severity::Info => log::info!("{}", diagnostic),
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticCollector {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// No error-severity diagnostics were collected
    pub fn is_valid(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Kinds in emission order
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.diagnostics.iter().map(|d| d.kind).collect()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.diagnostics)
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_validity() {
        let mut collector = DiagnosticCollector::new();
        assert!(collector.is_valid());

        collector.emit(Diagnostic::new(
            DiagnosticKind::InvalidValueLenient,
            "horse".to_string(),
            "<string>".to_string(),
        ));
        assert!(collector.is_valid()); // Warnings don't make it invalid

        collector.emit(Diagnostic::new(
            DiagnosticKind::OutOfRange,
            "11".to_string(),
            "<string>".to_string(),
        ));
        assert!(!collector.is_valid());
        assert_eq!(collector.errors().count(), 1);
        assert_eq!(collector.warnings().count(), 1);
    }

    #[test]
    fn test_json_uses_codes() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(
            Diagnostic::new(DiagnosticKind::CannotNegate, "!pig".into(), "pig".into())
                .with_audit("negatable".into()),
        );
        let json = collector.to_json().unwrap();
        assert!(json.contains("\"cannot_negate\""));
        assert!(json.contains("\"negatable\""));
        assert!(json.contains("\"error\""));
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnexpectedParameter,
            "foo=1".into(),
            "".into(),
        )
        .with_detail("foo".into());
        assert_eq!(diagnostic.to_string(), "unexpected parameter: 'foo=1' (foo)");
    }

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            DiagnosticKind::InvalidSelectorType,
            DiagnosticKind::InvalidTargetType,
            DiagnosticKind::UnexpectedParameter,
            DiagnosticKind::OnlyOneAllowed,
            DiagnosticKind::IncompatibleStructure,
            DiagnosticKind::TagMismatch,
            DiagnosticKind::Incompatible,
            DiagnosticKind::InvalidBoolean,
            DiagnosticKind::OutOfRange,
            DiagnosticKind::InvalidRangeSyntax,
            DiagnosticKind::InvalidValue,
            DiagnosticKind::InvalidValueLenient,
            DiagnosticKind::CannotNegate,
            DiagnosticKind::MixedNegation,
            DiagnosticKind::TooManyNonNegated,
            DiagnosticKind::TypeMismatch,
        ];
        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }
}
