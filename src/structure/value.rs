//! Parameter values
//!
//! The payload of one `key=value` occurrence. Schema trees additionally use
//! [`ValueKind::Mixed`] and the `negatable` / `supports_multiple` flags.

use std::fmt;
use std::sync::Arc;

use crate::audits::{Audit, AuditList};
use crate::config::Syntax;
use crate::parser::reader::quote_if_needed;
use crate::parser::snbt::Tag;

use super::parameters::ParametersContainer;

/// Concrete kind of a value, used for dispatch and compatibility checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Nbt,
    Parameters,
    Mixed,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Nbt => "nbt",
            ValueType::Parameters => "parameters",
            ValueType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Raw text; `None` on the schema side means "any string"
    String(Option<String>),
    /// Structured tag; `None` on the schema side means "any tag"
    Nbt(Option<Tag>),
    /// Nested `{key=value,...}` list
    Parameters(ParametersContainer),
    /// Schema-only set of alternative kinds
    Mixed(Vec<Value>),
}

/// One occurrence of a parameter's value
#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    /// Key of the owning parameter, set when the value is attached to one
    key: String,
    negated: bool,
    negatable: bool,
    supports_multiple: bool,
    audits: AuditList,
}

impl Value {
    fn from_kind(kind: ValueKind) -> Self {
        Self {
            kind,
            key: String::new(),
            negated: false,
            negatable: false,
            supports_multiple: false,
            audits: Vec::new(),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::from_kind(ValueKind::String(Some(text.into())))
    }

    /// Schema value accepting any string (subject to its audits)
    pub fn any_string() -> Self {
        Self::from_kind(ValueKind::String(None))
    }

    pub fn tag(tag: Tag) -> Self {
        Self::from_kind(ValueKind::Nbt(Some(tag)))
    }

    /// Schema value accepting any structured tag
    pub fn any_tag() -> Self {
        Self::from_kind(ValueKind::Nbt(None))
    }

    pub fn nested(parameters: ParametersContainer) -> Self {
        Self::from_kind(ValueKind::Parameters(parameters))
    }

    /// Schema value accepting any of `alternatives`, matched by concrete kind
    pub fn mixed(alternatives: Vec<Value>) -> Self {
        Self::from_kind(ValueKind::Mixed(alternatives))
    }

    /// Allow inputs to negate this value
    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }

    /// Allow the owning key to occur more than once in the input
    pub fn multiple(mut self) -> Self {
        self.supports_multiple = true;
        self
    }

    pub fn with_negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }

    pub fn with_shared_audit(mut self, audit: Arc<dyn Audit>) -> Self {
        self.audits.push(audit);
        self
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn value_type(&self) -> ValueType {
        match self.kind {
            ValueKind::String(_) => ValueType::String,
            ValueKind::Nbt(_) => ValueType::Nbt,
            ValueKind::Parameters(_) => ValueType::Parameters,
            ValueKind::Mixed(_) => ValueType::Mixed,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn set_key(&mut self, key: &str) {
        self.key = key.to_string();
    }

    pub fn set_negated(&mut self, negated: bool) {
        self.negated = negated;
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_negatable(&self) -> bool {
        self.negatable
    }

    pub fn supports_multiple(&self) -> bool {
        self.supports_multiple
    }

    pub fn audits(&self) -> &[Arc<dyn Audit>] {
        &self.audits
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(text) => text.as_deref(),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match &self.kind {
            ValueKind::Nbt(tag) => tag.as_ref(),
            _ => None,
        }
    }

    pub fn as_parameters(&self) -> Option<&ParametersContainer> {
        match &self.kind {
            ValueKind::Parameters(parameters) => Some(parameters),
            _ => None,
        }
    }

    pub fn as_parameters_mut(&mut self) -> Option<&mut ParametersContainer> {
        match &mut self.kind {
            ValueKind::Parameters(parameters) => Some(parameters),
            _ => None,
        }
    }

    pub fn alternatives(&self) -> &[Value] {
        match &self.kind {
            ValueKind::Mixed(alternatives) => alternatives,
            _ => &[],
        }
    }

    /// Mixed values delegate auditing to their alternatives
    pub fn uses_global_audits(&self) -> bool {
        !matches!(self.kind, ValueKind::Mixed(_))
    }

    /// Whether `other` can stand where this value is expected.
    /// Concrete kinds must be identical; a mixed value accepts any kind
    /// one of its alternatives accepts.
    pub fn compatible(&self, other: &Value) -> bool {
        match &self.kind {
            ValueKind::Mixed(alternatives) => alternatives.iter().any(|alt| alt.compatible(other)),
            _ => self.value_type() == other.value_type(),
        }
    }

    /// Render in selector syntax
    pub fn render(&self, syntax: &Syntax) -> String {
        match &self.kind {
            ValueKind::String(Some(text)) => quote_if_needed(text),
            ValueKind::String(None) => "<string>".to_string(),
            ValueKind::Nbt(Some(tag)) => tag.to_string(),
            ValueKind::Nbt(None) => "<nbt>".to_string(),
            ValueKind::Parameters(parameters) => format!(
                "{}{}{}",
                syntax.nested_open,
                parameters.render(syntax),
                syntax.nested_close
            ),
            ValueKind::Mixed(alternatives) => alternatives
                .iter()
                .map(|alt| alt.render(syntax))
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// Structural equality; attached audits are not compared
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.key == other.key
            && self.negated == other.negated
            && self.negatable == other.negatable
            && self.supports_multiple == other.supports_multiple
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}
