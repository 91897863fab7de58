//! Negation audits

use super::{Audit, AuditContext, Outcome};
use crate::structure::Node;
use crate::validation::diagnostics::DiagnosticKind;

/// A negated input value requires a negatable expected value
#[derive(Debug, Clone, Copy, Default)]
pub struct Negatable;

impl Audit for Negatable {
    fn name(&self) -> &'static str {
        "negatable"
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible, DiagnosticKind::CannotNegate]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let (Some(given), Some(schema)) = (input.as_value(), expected.as_value()) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        if given.is_negated() && !schema.is_negatable() {
            return ctx.fail(self, DiagnosticKind::CannotNegate, input, expected);
        }
        Outcome::Pass
    }
}

/// Values of one repeated key must be either all negated, or a single
/// non-negated value.
///
/// `type=!pig,type=!cow` passes; `type=pig,type=!cow` and `type=pig,type=cow`
/// do not. Keys such as `tag` that legitimately combine values should not
/// carry this audit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestrictedNegation;

impl Audit for RestrictedNegation {
    fn name(&self) -> &'static str {
        "restricted_negation"
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[
            DiagnosticKind::Incompatible,
            DiagnosticKind::MixedNegation,
            DiagnosticKind::TooManyNonNegated,
        ]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let (Some(given), Some(_)) = (input.as_parameter(), expected.as_parameter()) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        let negated = given.values().iter().filter(|v| v.is_negated()).count();
        let plain = given.values().len() - negated;

        if negated > 0 && plain > 0 {
            return ctx.fail(self, DiagnosticKind::MixedNegation, input, expected);
        }
        if plain > 1 {
            return ctx.fail(self, DiagnosticKind::TooManyNonNegated, input, expected);
        }
        Outcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Parameter, Value};
    use crate::validation::diagnostics::DiagnosticCollector;

    fn restricted(values: &[(&str, bool)]) -> Vec<DiagnosticKind> {
        let mut input = Parameter::new("type");
        for (text, negated) in values {
            input.add_value(Value::string(*text).with_negated(*negated));
        }
        let expected = Parameter::new("type");
        let mut collector = DiagnosticCollector::new();
        RestrictedNegation.audit(
            &mut AuditContext::new(&mut collector),
            Node::Parameter(&input),
            Node::Parameter(&expected),
        );
        collector.kinds()
    }

    #[test]
    fn test_restricted_negation() {
        assert!(restricted(&[("pig", false)]).is_empty());
        assert!(restricted(&[("pig", true), ("cow", true)]).is_empty());
        assert_eq!(
            restricted(&[("pig", false), ("cow", true)]),
            vec![DiagnosticKind::MixedNegation]
        );
        assert_eq!(
            restricted(&[("pig", false), ("cow", false)]),
            vec![DiagnosticKind::TooManyNonNegated]
        );
    }

    #[test]
    fn test_negatable_allows_when_declared() {
        let input = Value::string("pig").with_negated(true);
        let expected = Value::any_string().negatable();
        let mut collector = DiagnosticCollector::new();
        let outcome = Negatable.audit(
            &mut AuditContext::new(&mut collector),
            Node::Value(&input),
            Node::Value(&expected),
        );
        assert_eq!(outcome, Outcome::Pass);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_restricted_negation_needs_parameters() {
        let value = Value::string("pig");
        let mut collector = DiagnosticCollector::new();
        let outcome = RestrictedNegation.audit(
            &mut AuditContext::new(&mut collector),
            Node::Value(&value),
            Node::Value(&value),
        );
        assert_eq!(outcome, Outcome::Fail);
        assert_eq!(collector.kinds(), vec![DiagnosticKind::Incompatible]);
    }
}
