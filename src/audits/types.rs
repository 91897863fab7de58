//! Structural audits

use super::{Audit, AuditContext, Outcome};
use crate::structure::Node;
use crate::validation::diagnostics::DiagnosticKind;

/// The input value's kind must be compatible with the expected value
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesMatch;

impl Audit for TypesMatch {
    fn name(&self) -> &'static str {
        "types_match"
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible, DiagnosticKind::TypeMismatch]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let (Some(given), Some(schema)) = (input.as_value(), expected.as_value()) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        if !schema.compatible(given) {
            return ctx.fail_with(
                self,
                DiagnosticKind::TypeMismatch,
                input,
                expected,
                format!("expected {}, found {}", schema.value_type(), given.value_type()),
            );
        }
        Outcome::Pass
    }
}

/// Passes only when both nodes are values. Mostly used as a predicate
/// for global audits, see [`AuditExt::when`](super::AuditExt::when).
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureIsValue;

impl Audit for StructureIsValue {
    fn name(&self) -> &'static str {
        "structure_is_value"
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        if input.as_value().is_some() && expected.as_value().is_some() {
            return Outcome::Pass;
        }
        ctx.fail(self, DiagnosticKind::Incompatible, input, expected)
    }
}
