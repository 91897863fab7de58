//! Selector Data Model
//!
//! Tree types shared by parsed inputs and hand-built schemas.
//! No parsing or comparison logic lives here.

pub mod parameters;
pub mod selector;
pub mod value;

pub use parameters::{Parameter, ParametersContainer, PLACEHOLDER_KEY};
pub use selector::{
    DynamicSelector, PlayerSelector, Selector, SelectorType, TargetSelector, UuidSelector,
};
pub use value::{Value, ValueKind, ValueType};

use std::fmt;

/// A borrowed reference to any node of a selector tree.
///
/// Audits and diagnostics receive nodes in this form.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Selector(&'a Selector),
    Target(&'a TargetSelector),
    Parameters(&'a ParametersContainer),
    Parameter(&'a Parameter),
    Value(&'a Value),
}

impl<'a> Node<'a> {
    /// Short name of the node's concrete kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Selector(_) => "selector",
            Node::Target(target) => target.selector_type().as_str(),
            Node::Parameters(_) => "parameters",
            Node::Parameter(_) => "parameter",
            Node::Value(value) => value.value_type().as_str(),
        }
    }

    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&'a Parameter> {
        match self {
            Node::Parameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    pub fn as_target(&self) -> Option<&'a TargetSelector> {
        match self {
            Node::Target(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Selector(node) => fmt::Display::fmt(node, f),
            Node::Target(node) => fmt::Display::fmt(node, f),
            Node::Parameters(node) => fmt::Display::fmt(node, f),
            Node::Parameter(node) => fmt::Display::fmt(node, f),
            Node::Value(node) => fmt::Display::fmt(node, f),
        }
    }
}
