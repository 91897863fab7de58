//! Allow-list audits
//!
//! One configurable audit covers fixed lists, registries, and resource
//! registries, checking either a value's text or its parameter's key.

use std::sync::Arc;

use super::{Audit, AuditContext, Outcome};
use crate::parser::ids::{ResourceLocation, TAG_TOKEN};
use crate::registry::Registry;
use crate::structure::{Node, ValueKind};
use crate::validation::diagnostics::DiagnosticKind;

#[derive(Debug, Clone)]
enum Source {
    Fixed(Vec<String>),
    Registry(Arc<dyn Registry>),
}

/// Which string of the input node is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Value,
    Key,
}

#[derive(Debug, Clone)]
struct ResourceOptions {
    check_for_tag: bool,
    tag_registry: Option<Arc<dyn Registry>>,
    tag_lenient: bool,
}

/// The resolved string must be one of an allowed set.
///
/// A lenient audit accepts unknown strings but reports
/// [`DiagnosticKind::InvalidValueLenient`].
#[derive(Debug, Clone)]
pub struct HasValue {
    source: Source,
    subject: Subject,
    lenient: bool,
    resource: Option<ResourceOptions>,
}

impl HasValue {
    /// Value text must be in `values`
    pub fn new<S: Into<String>>(values: impl IntoIterator<Item = S>, lenient: bool) -> Self {
        Self {
            source: Source::Fixed(values.into_iter().map(Into::into).collect()),
            subject: Subject::Value,
            lenient,
            resource: None,
        }
    }

    /// Value text must be in `registry`
    pub fn from_registry(registry: Arc<dyn Registry>, lenient: bool) -> Self {
        Self {
            source: Source::Registry(registry),
            subject: Subject::Value,
            lenient,
            resource: None,
        }
    }

    /// Parameter key must be in `registry`
    pub fn key_from_registry(registry: Arc<dyn Registry>, lenient: bool) -> Self {
        Self {
            subject: Subject::Key,
            ..Self::from_registry(registry, lenient)
        }
    }

    /// Value must be a resource location (default namespace applied) in `registry`
    pub fn from_resource_registry(registry: Arc<dyn Registry>, lenient: bool) -> Self {
        Self {
            resource: Some(ResourceOptions {
                check_for_tag: false,
                tag_registry: None,
                tag_lenient: true,
            }),
            ..Self::from_registry(registry, lenient)
        }
    }

    /// Parameter key must be a resource location in `registry`
    pub fn key_from_resource_registry(registry: Arc<dyn Registry>, lenient: bool) -> Self {
        Self {
            subject: Subject::Key,
            ..Self::from_resource_registry(registry, lenient)
        }
    }

    /// Accept `#`-prefixed tags, checked against `tag_registry` when given.
    /// Only meaningful for resource registries.
    pub fn with_tags(mut self, tag_registry: Option<Arc<dyn Registry>>, tag_lenient: bool) -> Self {
        if let Some(resource) = self.resource.as_mut() {
            resource.check_for_tag = true;
            resource.tag_registry = tag_registry;
            resource.tag_lenient = tag_lenient;
        }
        self
    }

    fn allows_tags(&self) -> bool {
        self.resource.as_ref().is_some_and(|r| r.check_for_tag)
    }

    /// Extract the string this audit judges
    fn resolve(&self, input: Node<'_>) -> Result<String, String> {
        let raw = match (self.subject, input) {
            (_, Node::Parameter(parameter)) => parameter.key().to_string(),
            (Subject::Key, Node::Value(value)) => value.key().to_string(),
            (Subject::Value, Node::Value(value)) => match value.kind() {
                ValueKind::String(Some(text)) => text.clone(),
                _ => return Err(format!("{} value has no text", value.value_type())),
            },
            (_, other) => return Err(format!("cannot read a string from a {}", other.kind_name())),
        };
        if self.resource.is_none() {
            return Ok(raw);
        }
        ResourceLocation::parse(&raw, self.allows_tags())
            .map(|location| location.to_string())
            .map_err(|e| e.to_string())
    }

    fn is_tag(&self, value: &str) -> bool {
        self.allows_tags() && value.starts_with(TAG_TOKEN)
    }

    fn is_lenient(&self, value: &str) -> bool {
        let tag_lenient = self.resource.as_ref().is_some_and(|r| r.tag_lenient);
        (self.is_tag(value) && tag_lenient) || self.lenient
    }

    fn matches(&self, value: &str) -> bool {
        if self.is_tag(value) {
            if let Some(tags) = self.resource.as_ref().and_then(|r| r.tag_registry.as_ref()) {
                return tags.has(&value[TAG_TOKEN.len_utf8()..]);
            }
        }
        match &self.source {
            Source::Fixed(values) => values.iter().any(|v| v == value),
            Source::Registry(registry) => registry.has(value),
        }
    }
}

impl Audit for HasValue {
    fn name(&self) -> &'static str {
        match (&self.source, self.subject, self.resource.is_some()) {
            (Source::Fixed(_), _, _) => "has_value",
            (Source::Registry(_), Subject::Value, false) => "has_value_from_registry",
            (Source::Registry(_), Subject::Key, false) => "has_key_from_registry",
            (Source::Registry(_), Subject::Value, true) => "has_value_from_resource_registry",
            (Source::Registry(_), Subject::Key, true) => "has_key_from_resource_registry",
        }
    }

    fn describe(&self) -> String {
        let mut out = match &self.source {
            Source::Fixed(values) => format!("{}{{values=[{}]", self.name(), values.join(",")),
            Source::Registry(registry) => format!("{}{{registry={}", self.name(), registry.name()),
        };
        out.push_str(&format!(",lenient={}", self.lenient));
        if let Some(resource) = &self.resource
            && let Some(tags) = &resource.tag_registry
        {
            out.push_str(&format!(
                ",tag_registry={},tag_lenient={}",
                tags.name(),
                resource.tag_lenient
            ));
        }
        out.push('}');
        out
    }

    fn emits(&self) -> &'static [DiagnosticKind] {
        &[
            DiagnosticKind::Incompatible,
            DiagnosticKind::InvalidValue,
            DiagnosticKind::InvalidValueLenient,
        ]
    }

    fn audit(&self, ctx: &mut AuditContext<'_>, input: Node<'_>, expected: Node<'_>) -> Outcome {
        let value = match self.resolve(input) {
            Ok(value) => value,
            Err(reason) => {
                return ctx.fail_with(self, DiagnosticKind::Incompatible, input, expected, reason);
            }
        };
        if self.matches(&value) {
            return Outcome::Pass;
        }
        if self.is_lenient(&value) {
            log::warn!("{} leniently accepted unknown value '{}'", self.describe(), value);
            return ctx.warn(self, DiagnosticKind::InvalidValueLenient, input, expected, value);
        }
        ctx.fail_with(self, DiagnosticKind::InvalidValue, input, expected, value)
    }
}
