//! Syntax configuration for the selector grammar.
//!
//! Handles:
//! - The punctuation characters the parser and serializer agree on
//! - Loading overrides of those characters from TOML

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Punctuation of the selector grammar.
///
/// Every field is optional in TOML; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Syntax {
    /// Marks a dynamic selector (`@`)
    pub targeter: char,
    /// Opens the top-level parameter list (`[`)
    pub delimiter_open: char,
    /// Closes the top-level parameter list (`]`)
    pub delimiter_close: char,
    /// Opens a nested block (`{`)
    pub nested_open: char,
    /// Closes a nested block (`}`)
    pub nested_close: char,
    /// Separates parameters (`,`)
    pub separator: char,
    /// Separates a key from its value (`=`)
    pub designator: char,
    /// Negates a value (`!`)
    pub negator: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            targeter: '@',
            delimiter_open: '[',
            delimiter_close: ']',
            nested_open: '{',
            nested_close: '}',
            separator: ',',
            designator: '=',
            negator: '!',
        }
    }
}

impl Syntax {
    /// Parse a syntax definition from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let syntax: Syntax = toml::from_str(text).context("invalid syntax definition")?;
        syntax.check()?;
        Ok(syntax)
    }

    /// Load a syntax definition from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read syntax file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Whether the character has structural meaning in the grammar
    pub fn is_structural(&self, c: char) -> bool {
        self.chars().contains(&c)
    }

    fn chars(&self) -> [char; 8] {
        [
            self.targeter,
            self.delimiter_open,
            self.delimiter_close,
            self.nested_open,
            self.nested_close,
            self.separator,
            self.designator,
            self.negator,
        ]
    }

    /// Reject definitions where two roles share a character
    fn check(&self) -> Result<()> {
        let chars = self.chars();
        for (i, a) in chars.iter().enumerate() {
            if chars[i + 1..].contains(a) {
                anyhow::bail!("syntax character '{}' is assigned to more than one role", a);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let syntax = Syntax::default();
        assert_eq!(syntax.targeter, '@');
        assert_eq!(syntax.delimiter_open, '[');
        assert!(syntax.is_structural('='));
        assert!(!syntax.is_structural('a'));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let syntax = Syntax::from_toml_str("separator = ';'").unwrap();
        assert_eq!(syntax.separator, ';');
        assert_eq!(syntax.designator, '=');
    }

    #[test]
    fn test_duplicate_roles_rejected() {
        assert!(Syntax::from_toml_str("separator = '='").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Syntax::from_toml_str("colon = ':'").is_err());
    }
}
