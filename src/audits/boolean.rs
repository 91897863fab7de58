//! Boolean audit

use super::{Audit, AuditContext, Outcome};
use crate::structure::Node;
use crate::validation::diagnostics::DiagnosticKind;

/// Input must be a string value of exactly `true` or `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Audit for Boolean {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible, DiagnosticKind::InvalidBoolean]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        match input.as_value().and_then(|v| v.as_str()) {
            Some("true" | "false") => Outcome::Pass,
            Some(_) => ctx.fail(self, DiagnosticKind::InvalidBoolean, input, expected),
            None => ctx.fail(self, DiagnosticKind::Incompatible, input, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ParametersContainer, Value};
    use crate::validation::diagnostics::DiagnosticCollector;

    fn check(input: &Value) -> (Outcome, Vec<DiagnosticKind>) {
        let mut collector = DiagnosticCollector::new();
        let expected = Value::any_string();
        let outcome = Boolean.audit(
            &mut AuditContext::new(&mut collector),
            Node::Value(input),
            Node::Value(&expected),
        );
        (outcome, collector.kinds())
    }

    #[test]
    fn test_accepts_exact_literals() {
        assert_eq!(check(&Value::string("true")).0, Outcome::Pass);
        assert_eq!(check(&Value::string("false")).0, Outcome::Pass);
    }

    #[test]
    fn test_rejects_other_text() {
        let (outcome, kinds) = check(&Value::string("TRUE"));
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(kinds, vec![DiagnosticKind::InvalidBoolean]);
    }

    #[test]
    fn test_non_string_is_incompatible() {
        let (outcome, kinds) = check(&Value::nested(ParametersContainer::new()));
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(kinds, vec![DiagnosticKind::Incompatible]);
    }
}
