//! Selector Schema
//!
//! Parses selector strings (player names, UUIDs and `@type[key=value,...]`
//! dynamic selectors) and validates them against hand-built schema trees.
//!
//! This library provides:
//! - A backtracking selector parser with per-path value overrides
//! - A selector data model shared by inputs and schemas
//! - A pluggable audit library and a comparator that reports every violation
//! - Configurable grammar punctuation

pub mod audits;
pub mod config;
pub mod parser;
pub mod registry;
pub mod structure;
pub mod validation;

pub use audits::{Audit, AuditContext, AuditExt, Outcome};
pub use config::Syntax;
pub use parser::{ParseError, Parser};
pub use registry::{Registry, ReloadableRegistry, SimpleRegistry};
pub use structure::{
    DynamicSelector, Parameter, ParametersContainer, PlayerSelector, Selector, TargetSelector,
    UuidSelector, Value,
};
pub use validation::{
    Comparator, Diagnostic, DiagnosticCollector, DiagnosticKind, DiagnosticSink, Validator,
};
