//! Audit Library
//!
//! Audits are stateless predicates over `(context, input node, expected
//! node)`. Each one captures its configuration at construction, reports
//! violations through the [`AuditContext`], and returns an [`Outcome`].
//! Schema nodes carry ordered audit lists; the comparator also runs a list
//! of global audits on every node pair.

pub mod boolean;
pub mod has_value;
pub mod negation;
pub mod numeric;
pub mod string_length;
pub mod types;

pub use boolean::Boolean;
pub use has_value::HasValue;
pub use negation::{Negatable, RestrictedNegation};
pub use numeric::{Bounds, Numeric, NumericRange};
pub use string_length::StringLength;
pub use types::{StructureIsValue, TypesMatch};

use std::fmt;
use std::sync::Arc;

use crate::structure::Node;
use crate::validation::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, NullSink};

/// Ordered audits attached to a node
pub type AuditList = Vec<Arc<dyn Audit>>;

/// Result of one audit evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Accepted, but a warning diagnostic was reported
    Warn,
    Fail,
}

impl Outcome {
    pub fn passed(self) -> bool {
        !matches!(self, Outcome::Fail)
    }
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed { Outcome::Pass } else { Outcome::Fail }
    }
}

/// A validation rule attachable to schema nodes or to the comparator
pub trait Audit: Send + Sync + fmt::Debug {
    /// Stable identifier
    fn name(&self) -> &'static str;

    /// Identifier plus configuration, used in diagnostics
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Diagnostic kinds this audit may report
    fn emits(&self) -> &'static [DiagnosticKind];

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome;
}

/// Channel through which audits and the comparator report diagnostics
pub struct AuditContext<'s> {
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> AuditContext<'s> {
    pub fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        audit: Option<&dyn Audit>,
        input: Node<'_>,
        expected: Node<'_>,
        detail: Option<String>,
    ) {
        let mut diagnostic = Diagnostic::new(kind, input.to_string(), expected.to_string());
        if let Some(audit) = audit {
            diagnostic = diagnostic.with_audit(audit.describe());
        }
        if let Some(detail) = detail {
            diagnostic = diagnostic.with_detail(detail);
        }
        self.sink.emit(diagnostic);
    }

    /// Pass already-built diagnostics through to the sink
    pub fn emit_all(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.sink.emit(diagnostic);
        }
    }

    /// Report `kind` on behalf of `audit` and fail
    pub fn fail(
        &mut self,
        audit: &dyn Audit,
        kind: DiagnosticKind,
        input: Node<'_>,
        expected: Node<'_>,
    ) -> Outcome {
        self.report(kind, Some(audit), input, expected, None);
        Outcome::Fail
    }

    pub fn fail_with(
        &mut self,
        audit: &dyn Audit,
        kind: DiagnosticKind,
        input: Node<'_>,
        expected: Node<'_>,
        detail: impl Into<String>,
    ) -> Outcome {
        self.report(kind, Some(audit), input, expected, Some(detail.into()));
        Outcome::Fail
    }

    /// Report a non-fatal mismatch on behalf of `audit`
    pub fn warn(
        &mut self,
        audit: &dyn Audit,
        kind: DiagnosticKind,
        input: Node<'_>,
        expected: Node<'_>,
        detail: impl Into<String>,
    ) -> Outcome {
        self.report(kind, Some(audit), input, expected, Some(detail.into()));
        Outcome::Warn
    }
}

/// Runs an audit only when all of its predicates pass.
///
/// Predicates are evaluated without reporting; a failed predicate skips the
/// audit and counts as a pass.
#[derive(Debug, Clone)]
pub struct Conditional {
    audit: Arc<dyn Audit>,
    predicates: AuditList,
}

impl Conditional {
    pub fn new(audit: impl Audit + 'static) -> Self {
        Self {
            audit: Arc::new(audit),
            predicates: Vec::new(),
        }
    }

    pub fn when(mut self, predicate: impl Audit + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }
}

impl Audit for Conditional {
    fn name(&self) -> &'static str {
        self.audit.name()
    }

    fn describe(&self) -> String {
        self.audit.describe()
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        self.audit.emits()
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let mut muted = NullSink;
        let mut silent = AuditContext::new(&mut muted);
        let applicable = self
            .predicates
            .iter()
            .all(|predicate| predicate.audit(&mut silent, input, expected).passed());
        if !applicable {
            return Outcome::Pass;
        }
        self.audit.audit(ctx, input, expected)
    }
}

/// Attach predicates to any audit
pub trait AuditExt: Audit + Sized + 'static {
    fn when(self, predicate: impl Audit + 'static) -> Conditional {
        Conditional::new(self).when(predicate)
    }
}

impl<A: Audit + Sized + 'static> AuditExt for A {}

/// Run `audits` in order without short-circuiting; true if none failed
pub fn run_all(
    audits: &[Arc<dyn Audit>],
    ctx: &mut AuditContext<'_>,
    input: Node<'_>,
    expected: Node<'_>,
) -> bool {
    audits.iter().fold(true, |ok, audit| {
        let outcome = audit.audit(ctx, input, expected);
        log::trace!("audit {} on {}: {:?}", audit.describe(), input.kind_name(), outcome);
        ok & outcome.passed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Parameter, Value};
    use crate::validation::diagnostics::DiagnosticCollector;

    #[test]
    fn test_predicate_skips_silently() {
        let audit = Negatable.when(StructureIsValue);
        let mut collector = DiagnosticCollector::new();
        let mut ctx = AuditContext::new(&mut collector);

        let parameter = Parameter::new("x");
        let outcome = audit.audit(
            &mut ctx,
            Node::Parameter(&parameter),
            Node::Parameter(&parameter),
        );
        assert_eq!(outcome, Outcome::Pass);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_predicate_passes_through() {
        let audit = Negatable.when(StructureIsValue);
        let mut collector = DiagnosticCollector::new();
        let mut ctx = AuditContext::new(&mut collector);

        let input = Value::string("pig").with_negated(true);
        let expected = Value::any_string();
        let outcome = audit.audit(&mut ctx, Node::Value(&input), Node::Value(&expected));
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(collector.kinds(), vec![DiagnosticKind::CannotNegate]);
        assert_eq!(collector.diagnostics[0].audit.as_deref(), Some("negatable"));
    }

    #[test]
    fn test_run_all_does_not_short_circuit() {
        let audits: AuditList = vec![Arc::new(Boolean), Arc::new(Numeric::unbounded())];
        let mut collector = DiagnosticCollector::new();
        let mut ctx = AuditContext::new(&mut collector);

        let input = Value::string("maybe");
        let expected = Value::any_string();
        assert!(!run_all(&audits, &mut ctx, Node::Value(&input), Node::Value(&expected)));
        assert_eq!(collector.len(), 2);
    }
}
