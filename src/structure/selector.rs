//! Selectors
//!
//! The root [`Selector`] and the three target-selector variants.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::audits::{Audit, AuditList};
use crate::config::Syntax;
use crate::registry::{Registry, SimpleRegistry};

use super::parameters::ParametersContainer;
use super::value::Value;

/// Discriminant of a target-selector variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorType {
    PlayerName,
    Uuid,
    Dynamic,
}

impl SelectorType {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorType::PlayerName => "player_name",
            SelectorType::Uuid => "uuid",
            SelectorType::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for SelectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root of a selector tree.
///
/// A schema lists every acceptable variant; a parsed input holds exactly one.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    accepted: Vec<TargetSelector>,
    audits: AuditList,
}

impl Selector {
    pub fn new(accepted: Vec<TargetSelector>) -> Self {
        Self {
            accepted,
            audits: Vec::new(),
        }
    }

    pub fn single(target: impl Into<TargetSelector>) -> Self {
        Self::new(vec![target.into()])
    }

    pub fn accept(mut self, target: impl Into<TargetSelector>) -> Self {
        self.accepted.push(target.into());
        self
    }

    pub fn accepted(&self) -> &[TargetSelector] {
        &self.accepted
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }

    pub fn audits(&self) -> &[Arc<dyn Audit>] {
        &self.audits
    }

    pub fn render(&self, syntax: &Syntax) -> String {
        match self.accepted.as_slice() {
            [only] => only.render(syntax),
            _ => "mixed_selector".to_string(),
        }
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.accepted == other.accepted
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}

/// One kind of thing a selector can denote
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSelector {
    PlayerName(PlayerSelector),
    Uuid(UuidSelector),
    Dynamic(DynamicSelector),
}

impl TargetSelector {
    pub fn selector_type(&self) -> SelectorType {
        match self {
            TargetSelector::PlayerName(_) => SelectorType::PlayerName,
            TargetSelector::Uuid(_) => SelectorType::Uuid,
            TargetSelector::Dynamic(_) => SelectorType::Dynamic,
        }
    }

    pub fn audits(&self) -> &[Arc<dyn Audit>] {
        match self {
            TargetSelector::PlayerName(s) => &s.audits,
            TargetSelector::Uuid(s) => &s.audits,
            TargetSelector::Dynamic(s) => &s.audits,
        }
    }

    pub fn render(&self, syntax: &Syntax) -> String {
        match self {
            TargetSelector::PlayerName(s) => s.name.clone().unwrap_or_default(),
            TargetSelector::Uuid(s) => s.uuid.map(|u| u.to_string()).unwrap_or_default(),
            TargetSelector::Dynamic(s) => s.render(syntax),
        }
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}

/// Name-based targeting; `None` on the schema side accepts any name
#[derive(Debug, Clone, Default)]
pub struct PlayerSelector {
    name: Option<String>,
    audits: AuditList,
}

impl PlayerSelector {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            audits: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }
}

impl PartialEq for PlayerSelector {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl From<PlayerSelector> for TargetSelector {
    fn from(selector: PlayerSelector) -> Self {
        TargetSelector::PlayerName(selector)
    }
}

/// UUID-based targeting; `None` on the schema side accepts any UUID
#[derive(Debug, Clone, Default)]
pub struct UuidSelector {
    uuid: Option<Uuid>,
    audits: AuditList,
}

impl UuidSelector {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(uuid: Uuid) -> Self {
        Self {
            uuid: Some(uuid),
            audits: Vec::new(),
        }
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }
}

impl PartialEq for UuidSelector {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl From<UuidSelector> for TargetSelector {
    fn from(selector: UuidSelector) -> Self {
        TargetSelector::Uuid(selector)
    }
}

/// Type + parameters targeting, e.g. `@e[type=pig]`
#[derive(Debug, Clone)]
pub struct DynamicSelector {
    /// Allowed target types (schema) or the declared type (input)
    targets: Arc<dyn Registry>,
    parameters: ParametersContainer,
    audits: AuditList,
}

impl DynamicSelector {
    pub fn new(targets: Arc<dyn Registry>, parameters: ParametersContainer) -> Self {
        Self {
            targets,
            parameters,
            audits: Vec::new(),
        }
    }

    /// Input-side selector with one declared type; an empty type means "any"
    pub fn with_type(target: &str, parameters: ParametersContainer) -> Self {
        let values: Vec<&str> = if target.is_empty() { vec![] } else { vec![target] };
        Self::new(Arc::new(SimpleRegistry::new("target", values)), parameters)
    }

    pub fn targets(&self) -> &Arc<dyn Registry> {
        &self.targets
    }

    pub fn parameters(&self) -> &ParametersContainer {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ParametersContainer {
        &mut self.parameters
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.parameters.add_value(key, value);
        self
    }

    pub fn with_placeholder(self, value: Value) -> Self {
        self.with_value(super::parameters::PLACEHOLDER_KEY, value)
    }

    pub fn with_parameter_audit(mut self, key: &str, audit: impl Audit + 'static) -> Self {
        self.parameters.entry(key).add_audit(Arc::new(audit));
        self
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }

    pub fn render(&self, syntax: &Syntax) -> String {
        let targets = self.targets.values();
        let mut out = String::new();
        out.push(syntax.targeter);
        out.push_str(&targets.join("|"));
        if !self.parameters.is_empty() {
            out.push(syntax.delimiter_open);
            out.push_str(&self.parameters.render(syntax));
            out.push(syntax.delimiter_close);
        }
        out
    }
}

impl PartialEq for DynamicSelector {
    fn eq(&self, other: &Self) -> bool {
        self.targets.values() == other.targets.values() && self.parameters == other.parameters
    }
}

impl From<DynamicSelector> for TargetSelector {
    fn from(selector: DynamicSelector) -> Self {
        TargetSelector::Dynamic(selector)
    }
}
