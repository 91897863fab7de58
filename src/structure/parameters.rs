//! Parameters and parameter containers
//!
//! A container maps keys to parameters in first-occurrence order. The empty
//! key is reserved for the schema placeholder.

use std::fmt;
use std::sync::Arc;

use crate::audits::{Audit, AuditList};
use crate::config::Syntax;

use super::value::Value;

/// Key of the placeholder parameter that absorbs undeclared input keys
pub const PLACEHOLDER_KEY: &str = "";

/// A named slot holding every value given for that key
#[derive(Debug, Clone)]
pub struct Parameter {
    key: String,
    values: Vec<Value>,
    audits: AuditList,
}

impl Parameter {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
            audits: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_placeholder(&self) -> bool {
        self.key == PLACEHOLDER_KEY
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Append a value, binding it to this parameter's key
    pub fn add_value(&mut self, mut value: Value) {
        value.set_key(&self.key);
        self.values.push(value);
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.add_value(value);
        self
    }

    pub fn add_audit(&mut self, audit: Arc<dyn Audit>) {
        self.audits.push(audit);
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.add_audit(Arc::new(audit));
        self
    }

    pub fn audits(&self) -> &[Arc<dyn Audit>] {
        &self.audits
    }

    /// Render as `key=value,key=!value,...`
    pub fn render(&self, syntax: &Syntax) -> String {
        self.values
            .iter()
            .map(|value| {
                let negator = if value.is_negated() {
                    syntax.negator.to_string()
                } else {
                    String::new()
                };
                format!(
                    "{}{}{}{}",
                    self.key,
                    syntax.designator,
                    negator,
                    value.render(syntax)
                )
            })
            .collect::<Vec<_>>()
            .join(&syntax.separator.to_string())
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.values == other.values
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}

/// Ordered collection of parameters with unique keys
#[derive(Debug, Clone, Default)]
pub struct ParametersContainer {
    parameters: Vec<Parameter>,
    audits: AuditList,
}

impl ParametersContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.key == key)
    }

    pub fn placeholder(&self) -> Option<&Parameter> {
        self.get(PLACEHOLDER_KEY)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Get the parameter for `key`, creating it at the end if missing
    pub fn entry(&mut self, key: &str) -> &mut Parameter {
        let index = match self.parameters.iter().position(|p| p.key == key) {
            Some(index) => index,
            None => {
                self.parameters.push(Parameter::new(key));
                self.parameters.len() - 1
            }
        };
        &mut self.parameters[index]
    }

    /// Insert a parameter, replacing any existing one with the same key in place
    pub fn set_parameter(&mut self, parameter: Parameter) {
        match self.get_mut(&parameter.key) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
    }

    pub fn add_value(&mut self, key: &str, value: Value) {
        self.entry(key).add_value(value);
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.add_value(key, value);
        self
    }

    /// Declare the placeholder value matched against undeclared keys
    pub fn with_placeholder(self, value: Value) -> Self {
        self.with_value(PLACEHOLDER_KEY, value)
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.set_parameter(parameter);
        self
    }

    /// Attach audits to one parameter, e.g. rules over repeated keys
    pub fn add_audits_to_parameter(
        &mut self,
        key: &str,
        audits: impl IntoIterator<Item = Arc<dyn Audit>>,
    ) {
        let parameter = self.entry(key);
        for audit in audits {
            parameter.add_audit(audit);
        }
    }

    pub fn with_parameter_audit(mut self, key: &str, audit: impl Audit + 'static) -> Self {
        self.entry(key).add_audit(Arc::new(audit));
        self
    }

    pub fn with_audit(mut self, audit: impl Audit + 'static) -> Self {
        self.audits.push(Arc::new(audit));
        self
    }

    pub fn audits(&self) -> &[Arc<dyn Audit>] {
        &self.audits
    }

    pub fn render(&self, syntax: &Syntax) -> String {
        self.parameters
            .iter()
            .map(|p| p.render(syntax))
            .collect::<Vec<_>>()
            .join(&syntax.separator.to_string())
    }
}

impl PartialEq for ParametersContainer {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
    }
}

impl fmt::Display for ParametersContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_accumulate_in_order() {
        let container = ParametersContainer::new()
            .with_value("tag", Value::string("a"))
            .with_value("x", Value::string("1"))
            .with_value("tag", Value::string("b"));

        assert_eq!(container.len(), 2);
        assert_eq!(container.parameters()[0].key(), "tag");
        assert_eq!(container.get("tag").unwrap().values().len(), 2);
        assert_eq!(container.to_string(), "tag=a,tag=b,x=1");
    }

    #[test]
    fn test_value_takes_parameter_key() {
        let container = ParametersContainer::new().with_value("type", Value::string("pig"));
        assert_eq!(container.get("type").unwrap().values()[0].key(), "type");
    }

    #[test]
    fn test_placeholder() {
        let container = ParametersContainer::new().with_placeholder(Value::any_string());
        assert!(container.placeholder().unwrap().is_placeholder());
        assert!(ParametersContainer::new().placeholder().is_none());
    }

    #[test]
    fn test_set_parameter_replaces_in_place() {
        let mut container = ParametersContainer::new()
            .with_value("a", Value::string("1"))
            .with_value("b", Value::string("2"));
        container.set_parameter(Parameter::new("a").with_value(Value::string("3")));
        assert_eq!(container.to_string(), "a=3,b=2");
    }

    #[test]
    fn test_negated_render() {
        let container =
            ParametersContainer::new().with_value("type", Value::string("cow").with_negated(true));
        assert_eq!(container.to_string(), "type=!cow");
    }
}
