//! String length audit

use super::numeric::Numeric;
use super::{Audit, AuditContext, Outcome};
use crate::structure::{Node, TargetSelector, ValueKind};
use crate::validation::diagnostics::DiagnosticKind;

/// Length of a string value or player name must lie within bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringLength {
    limits: Numeric,
}

impl StringLength {
    pub fn new(min: Option<usize>, max: Option<usize>, inclusive: bool) -> Self {
        Self {
            limits: Numeric::new(min.map(|n| n as f64), max.map(|n| n as f64), inclusive),
        }
    }
}

fn text_of<'a>(input: Node<'a>) -> Option<&'a str> {
    match input {
        Node::Value(value) => match value.kind() {
            ValueKind::String(text) => Some(text.as_deref().unwrap_or_default()),
            _ => None,
        },
        Node::Target(TargetSelector::PlayerName(player)) => Some(player.name().unwrap_or_default()),
        _ => None,
    }
}

impl Audit for StringLength {
    fn name(&self) -> &'static str {
        "string_length"
    }

    fn describe(&self) -> String {
        format!(
            "string_length{{{},inclusive={}}}",
            self.limits.bounds(),
            self.limits.is_inclusive()
        )
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[DiagnosticKind::Incompatible, DiagnosticKind::OutOfRange]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let Some(text) = text_of(input) else {
            return ctx.fail(self, DiagnosticKind::Incompatible, input, expected);
        };
        let length = text.chars().count();
        if !self.limits.accepts(length as f64) {
            return ctx.fail_with(
                self,
                DiagnosticKind::OutOfRange,
                input,
                expected,
                format!("length {}", length),
            );
        }
        Outcome::Pass
    }
}
