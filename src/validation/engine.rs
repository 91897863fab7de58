//! Comparison Engine
//!
//! Walks an expected (schema) tree and a parsed input tree in lock-step.
//! Every mismatch becomes one diagnostic; the walk never stops early, so a
//! single comparison reports every problem it can find.

use std::sync::Arc;

use crate::audits::{self, Audit, AuditContext, AuditList};
use crate::parser::{ParseError, Parser};
use crate::registry::Registry;
use crate::structure::{
    Node, Parameter, ParametersContainer, Selector, TargetSelector, Value, ValueKind,
};

use super::diagnostics::{DiagnosticCollector, DiagnosticKind, DiagnosticSink};

/// Compares input trees against schema trees.
///
/// Global audits run on every compared node pair in addition to the audits
/// attached to the schema node itself.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    global_audits: AuditList,
}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.global_audits.push(Arc::new(audit));
        self
    }

    pub fn add_global_audit(&mut self, audit: Arc<dyn Audit>) {
        self.global_audits.push(audit);
    }

    pub fn global_audits(&self) -> &[Arc<dyn Audit>] {
        &self.global_audits
    }

    /// Compare `input` against `expected`, reporting every violation to `sink`.
    ///
    /// Returns true when no audit or structural check failed. Lenient
    /// mismatches are reported but do not fail the comparison.
    pub fn compare(
        &self,
        expected: &Selector,
        input: &Selector,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let mut ctx = AuditContext::new(sink);
        self.compare_selector(&mut ctx, expected, input)
    }

    /// Run the schema node's audits, then the global audits when enabled
    fn audit_node(
        &self,
        ctx: &mut AuditContext<'_>,
        own: &[Arc<dyn Audit>],
        use_global: bool,
        input: Node<'_>,
        expected: Node<'_>,
    ) -> bool {
        log::trace!("comparing {} '{}' against '{}'", input.kind_name(), input, expected);
        let own_passed = audits::run_all(own, ctx, input, expected);
        let global_passed =
            !use_global || audits::run_all(&self.global_audits, ctx, input, expected);
        own_passed && global_passed
    }

    fn compare_selector(
        &self,
        ctx: &mut AuditContext<'_>,
        expected: &Selector,
        input: &Selector,
    ) -> bool {
        // Failed alternatives only report when none of them matched
        let mut rejected = DiagnosticCollector::new();
        let mut matched = false;
        'search: for accepted in expected.accepted() {
            for given in input.accepted() {
                if accepted.selector_type() != given.selector_type() {
                    continue;
                }
                let mut attempt = DiagnosticCollector::new();
                if self.compare_target(&mut AuditContext::new(&mut attempt), accepted, given) {
                    ctx.emit_all(attempt.diagnostics);
                    matched = true;
                    break 'search;
                }
                rejected.diagnostics.extend(attempt.diagnostics);
            }
        }
        if !matched {
            ctx.emit_all(rejected.diagnostics);
            ctx.report(
                DiagnosticKind::InvalidSelectorType,
                None,
                Node::Selector(input),
                Node::Selector(expected),
                None,
            );
        }
        let audited = self.audit_node(
            ctx,
            expected.audits(),
            true,
            Node::Selector(input),
            Node::Selector(expected),
        );
        audited && matched
    }

    fn compare_target(
        &self,
        ctx: &mut AuditContext<'_>,
        expected: &TargetSelector,
        input: &TargetSelector,
    ) -> bool {
        let matched = match (expected, input) {
            (TargetSelector::Dynamic(schema), TargetSelector::Dynamic(given)) => {
                let targets_matched =
                    targets_match(schema.targets().as_ref(), given.targets().as_ref());
                if !targets_matched {
                    ctx.report(
                        DiagnosticKind::InvalidTargetType,
                        None,
                        Node::Target(input),
                        Node::Target(expected),
                        Some(format!("allowed types: {}", schema.targets().values().join(","))),
                    );
                }
                let parameters_matched =
                    self.compare_container(ctx, schema.parameters(), given.parameters());
                targets_matched && parameters_matched
            }
            (TargetSelector::PlayerName(_), TargetSelector::PlayerName(_))
            | (TargetSelector::Uuid(_), TargetSelector::Uuid(_)) => true,
            _ => {
                ctx.report(
                    DiagnosticKind::IncompatibleStructure,
                    None,
                    Node::Target(input),
                    Node::Target(expected),
                    None,
                );
                false
            }
        };
        let audited = self.audit_node(
            ctx,
            expected.audits(),
            true,
            Node::Target(input),
            Node::Target(expected),
        );
        audited && matched
    }

    fn compare_container(
        &self,
        ctx: &mut AuditContext<'_>,
        expected: &ParametersContainer,
        input: &ParametersContainer,
    ) -> bool {
        let placeholder = expected.placeholder();
        let mut matched = true;
        let mut deferred = Vec::new();

        for parameter in input.parameters() {
            match (expected.get(parameter.key()), placeholder) {
                (Some(schema), _) => matched &= self.compare_parameter(ctx, schema, parameter),
                (None, Some(_)) => deferred.push(parameter),
                (None, None) => {
                    self.unexpected(ctx, parameter, expected);
                    matched = false;
                }
            }
        }

        if let Some(placeholder) = placeholder {
            for parameter in deferred {
                if !self.compare_parameter(ctx, placeholder, parameter) {
                    self.unexpected(ctx, parameter, expected);
                    matched = false;
                }
            }
        }

        let audited = self.audit_node(
            ctx,
            expected.audits(),
            true,
            Node::Parameters(input),
            Node::Parameters(expected),
        );
        audited && matched
    }

    fn unexpected(
        &self,
        ctx: &mut AuditContext<'_>,
        parameter: &Parameter,
        expected: &ParametersContainer,
    ) {
        ctx.report(
            DiagnosticKind::UnexpectedParameter,
            None,
            Node::Parameter(parameter),
            Node::Parameters(expected),
            Some(parameter.key().to_string()),
        );
    }

    /// Every schema value is compared with every input value under the key
    fn compare_parameter(
        &self,
        ctx: &mut AuditContext<'_>,
        expected: &Parameter,
        input: &Parameter,
    ) -> bool {
        let mut matched = true;
        for schema in expected.values() {
            for given in input.values() {
                matched &= self.compare_value(ctx, schema, given);
            }
            if input.values().len() > 1 && !schema.supports_multiple() {
                ctx.report(
                    DiagnosticKind::OnlyOneAllowed,
                    None,
                    Node::Parameter(input),
                    Node::Parameter(expected),
                    Some(format!("{} values given", input.values().len())),
                );
                matched = false;
            }
        }
        let audited = self.audit_node(
            ctx,
            expected.audits(),
            true,
            Node::Parameter(input),
            Node::Parameter(expected),
        );
        audited && matched
    }

    fn compare_value(&self, ctx: &mut AuditContext<'_>, expected: &Value, input: &Value) -> bool {
        let matched = match (expected.kind(), input.kind()) {
            (ValueKind::Mixed(alternatives), _) => {
                match alternatives
                    .iter()
                    .find(|alt| alt.value_type() == input.value_type())
                {
                    Some(alternative) => self.compare_value(ctx, alternative, input),
                    None => {
                        ctx.report(
                            DiagnosticKind::IncompatibleStructure,
                            None,
                            Node::Value(input),
                            Node::Value(expected),
                            Some(format!("no alternative accepts {}", input.value_type())),
                        );
                        false
                    }
                }
            }
            (ValueKind::Parameters(schema), ValueKind::Parameters(given)) => {
                self.compare_container(ctx, schema, given)
            }
            (ValueKind::Parameters(_), _) => {
                ctx.report(
                    DiagnosticKind::IncompatibleStructure,
                    None,
                    Node::Value(input),
                    Node::Value(expected),
                    Some(format!("expected parameters, found {}", input.value_type())),
                );
                false
            }
            (ValueKind::Nbt(Some(schema)), ValueKind::Nbt(Some(given))) if schema != given => {
                ctx.report(
                    DiagnosticKind::TagMismatch,
                    None,
                    Node::Value(input),
                    Node::Value(expected),
                    None,
                );
                false
            }
            // Strings and tags carry no built-in check; their audits decide
            _ => true,
        };
        let audited = self.audit_node(
            ctx,
            expected.audits(),
            expected.uses_global_audits(),
            Node::Value(input),
            Node::Value(expected),
        );
        audited && matched
    }
}

/// Both sides untyped, or the input's first declared type is allowed.
///
/// Only the first input type is inspected; parsed inputs declare at most one.
fn targets_match(allowed: &dyn Registry, declared: &dyn Registry) -> bool {
    let declared = declared.values();
    if declared.is_empty() && allowed.is_empty() {
        return true;
    }
    declared.first().is_some_and(|target| allowed.has(target))
}

/// Parses raw selectors and compares them against a schema in one step
#[derive(Debug, Clone, Default)]
pub struct Validator {
    parser: Parser,
    comparator: Comparator,
}

impl Validator {
    pub fn new(parser: Parser, comparator: Comparator) -> Self {
        Self { parser, comparator }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Parse `raw` and compare it against `schema`.
    ///
    /// A malformed selector is a hard error; schema violations are reported
    /// to `sink` and folded into the returned boolean.
    pub fn validate(
        &self,
        raw: &str,
        schema: &Selector,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<bool, ParseError> {
        let input = self.parser.parse(raw)?;
        Ok(self.comparator.compare(schema, &input, sink))
    }

    /// Like [`Validator::validate`], collecting diagnostics in memory
    pub fn collect(&self, raw: &str, schema: &Selector) -> Result<DiagnosticCollector, ParseError> {
        let mut collector = DiagnosticCollector::new();
        self.validate(raw, schema, &mut collector)?;
        Ok(collector)
    }
}
