//! Selector Parser
//!
//! Turns a raw selector string into a [`Selector`] tree. Values opening with
//! a nested block are disambiguated by trying, in order, a nested parameter
//! list, a structured tag and raw text, rewinding the cursor between tries.

pub mod error;
pub mod ids;
pub mod overrides;
pub mod reader;
pub mod snbt;

pub use error::ParseError;
pub use ids::{parse_uuid, ResourceLocation};
pub use overrides::Override;
pub use reader::StringReader;
use reader::is_unquoted_char;
pub use snbt::{SnbtParser, Tag, TagParser};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Syntax;
use crate::structure::{
    DynamicSelector, ParametersContainer, PlayerSelector, Selector, TargetSelector, UuidSelector,
    Value, ValueKind,
};

/// One way of reading a value that opens with a nested block
type Attempt = fn(&Parser, &mut StringReader, &str) -> Result<Value, ParseError>;

/// Selector parser.
///
/// Holds no per-parse state, so one instance can serve many threads as long
/// as its overrides are not changed mid-parse.
#[derive(Clone)]
pub struct Parser {
    syntax: Syntax,
    overrides: HashMap<String, Override>,
    tag_parser: Arc<dyn TagParser>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.overrides().collect();
        paths.sort_unstable();
        f.debug_struct("Parser")
            .field("syntax", &self.syntax)
            .field("overrides", &paths)
            .finish()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            overrides: HashMap::new(),
            tag_parser: Arc::new(SnbtParser),
        }
    }

    /// Replace the structured-tag parser
    pub fn with_tag_parser(mut self, tag_parser: Arc<dyn TagParser>) -> Self {
        self.tag_parser = tag_parser;
        self
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Read values at `path` with `read` instead of detecting their kind.
    ///
    /// Paths are dotted from the root list: `nbt` for a top-level key,
    /// `scores.kills` for `kills` nested inside `scores={...}`.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        read: impl Fn(&Parser, &mut StringReader) -> Result<Value, ParseError>
        + Send
        + Sync
        + 'static,
    ) {
        self.overrides.insert(path.into(), Arc::new(read));
    }

    pub fn with_override(
        mut self,
        path: impl Into<String>,
        read: impl Fn(&Parser, &mut StringReader) -> Result<Value, ParseError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.add_override(path, read);
        self
    }

    /// Returns whether an override was registered for `path`
    pub fn remove_override(&mut self, path: &str) -> bool {
        self.overrides.remove(path).is_some()
    }

    /// Paths with a registered override, in no particular order
    pub fn overrides(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Parse a complete selector string
    pub fn parse(&self, input: &str) -> Result<Selector, ParseError> {
        let mut reader = StringReader::new(input);
        let target = self.parse_target(&mut reader, input)?;
        Ok(Selector::single(target))
    }

    fn parse_target(
        &self,
        reader: &mut StringReader,
        input: &str,
    ) -> Result<TargetSelector, ParseError> {
        if reader.at(self.syntax.targeter) {
            log::debug!("parsing '{}' as a dynamic selector", input);
            return self.parse_dynamic(reader).map(TargetSelector::from);
        }
        if let Some(uuid) = ids::parse_uuid(input) {
            log::debug!("parsing '{}' as a uuid", input);
            return Ok(UuidSelector::of(uuid).into());
        }
        log::debug!("parsing '{}' as a player name", input);
        Ok(PlayerSelector::named(input).into())
    }

    fn parse_dynamic(&self, reader: &mut StringReader) -> Result<DynamicSelector, ParseError> {
        let syntax = &self.syntax;
        reader.skip();
        let target = reader.read_while(|c| !syntax.is_structural(c) && !c.is_whitespace());

        let mut parameters = ParametersContainer::new();
        if reader.at(syntax.delimiter_open) {
            reader.skip();
            if !reader.can_read() {
                return Err(ParseError::EmptyParameters {
                    cursor: reader.cursor(),
                });
            }
            parameters = self.parse_parameters(reader, syntax.delimiter_close, "")?;
            reader.expect(syntax.delimiter_close)?;
        }

        if reader.can_read() {
            return Err(ParseError::TrailingInput {
                rest: reader.remaining(),
                cursor: reader.cursor(),
            });
        }
        Ok(DynamicSelector::with_type(&target, parameters))
    }

    /// Parse `key=value` pairs up to, but not including, `close`.
    ///
    /// Shared by the top-level list and nested blocks; `parent` is the
    /// dotted path of the enclosing key, empty at the root.
    fn parse_parameters(
        &self,
        reader: &mut StringReader,
        close: char,
        parent: &str,
    ) -> Result<ParametersContainer, ParseError> {
        let syntax = &self.syntax;
        let mut container = ParametersContainer::new();

        while reader.can_read() && !reader.at(close) {
            let key = self.read_key(reader)?;
            let path = if parent.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", parent, key)
            };

            let negated = reader.at(syntax.negator);
            if negated {
                reader.skip();
            }

            let mut value = self.read_value(reader, &path)?;
            value.set_negated(negated);
            container.add_value(&key, value);

            match reader.peek() {
                Some(c) if c == syntax.separator => reader.skip(),
                Some(c) if c == close => {}
                Some(found) => {
                    return Err(ParseError::UnexpectedCharacter {
                        found,
                        cursor: reader.cursor(),
                    });
                }
                None => {
                    return Err(ParseError::Unterminated {
                        expected: close,
                        cursor: reader.cursor(),
                    });
                }
            }
        }

        Ok(container)
    }

    /// Read a key and consume the designator after it
    fn read_key(&self, reader: &mut StringReader) -> Result<String, ParseError> {
        let syntax = &self.syntax;
        let start = reader.cursor();
        let key = reader.read_while(|c| is_unquoted_char(c) && !syntax.is_structural(c));
        if key.is_empty() {
            return match reader.peek() {
                Some(found) => Err(ParseError::UnexpectedCharacter {
                    found,
                    cursor: start,
                }),
                None => Err(ParseError::PrematureEnd { cursor: start }),
            };
        }
        reader.expect(syntax.designator)?;
        Ok(key)
    }

    fn read_value(&self, reader: &mut StringReader, path: &str) -> Result<Value, ParseError> {
        if !reader.can_read() {
            return Err(ParseError::PrematureEnd {
                cursor: reader.cursor(),
            });
        }
        if let Some(read) = self.overrides.get(path) {
            return self.read_overridden(reader, path, read.as_ref());
        }
        if reader.at(self.syntax.nested_open) {
            return self.read_block(reader, path);
        }
        Ok(Value::string(reader.read_string()?))
    }

    fn read_overridden(
        &self,
        reader: &mut StringReader,
        path: &str,
        read: &(dyn Fn(&Parser, &mut StringReader) -> Result<Value, ParseError> + Send + Sync),
    ) -> Result<Value, ParseError> {
        let start = reader.cursor();
        log::debug!("reading '{}' through its override", path);
        let value = read(self, reader).map_err(|e| ParseError::Override {
            path: path.to_string(),
            message: e.to_string(),
            cursor: e.cursor(),
        })?;
        if matches!(value.kind(), ValueKind::Mixed(_)) {
            return Err(ParseError::SchemaOnlyValue {
                path: path.to_string(),
                cursor: start,
            });
        }
        Ok(value)
    }

    /// Value opening with a nested block
    fn read_block(&self, reader: &mut StringReader, path: &str) -> Result<Value, ParseError> {
        let attempts: [(&str, Attempt); 2] = [
            ("nested parameters", Self::read_nested),
            ("structured tag", Self::read_tag_attempt),
        ];
        let start = reader.cursor();
        for (label, attempt) in attempts {
            match attempt(self, reader, path) {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_recoverable() => return Err(e),
                Err(e) => {
                    log::debug!("'{}' is not {}: {}; rewinding to {}", path, label, e, start);
                    reader.set_cursor(start);
                }
            }
        }
        log::debug!("reading '{}' as raw text", path);
        self.read_raw_block(reader)
    }

    fn read_nested(&self, reader: &mut StringReader, path: &str) -> Result<Value, ParseError> {
        reader.expect(self.syntax.nested_open)?;
        let parameters = self.parse_parameters(reader, self.syntax.nested_close, path)?;
        reader.expect(self.syntax.nested_close)?;
        Ok(Value::nested(parameters))
    }

    fn read_tag_attempt(
        &self,
        reader: &mut StringReader,
        _path: &str,
    ) -> Result<Value, ParseError> {
        self.read_tag(reader)
    }

    /// Read a structured tag with the configured tag parser
    pub fn read_tag(&self, reader: &mut StringReader) -> Result<Value, ParseError> {
        self.tag_parser.parse_compound(reader).map(Value::tag)
    }

    /// Text from the opening brace through its matching close, braces kept
    fn read_raw_block(&self, reader: &mut StringReader) -> Result<Value, ParseError> {
        let start = reader.cursor();
        let mut depth = 0usize;
        while let Some(c) = reader.read() {
            if c == self.syntax.nested_open {
                depth += 1;
            } else if c == self.syntax.nested_close {
                depth -= 1;
                if depth == 0 {
                    return Ok(Value::string(reader.slice(start, reader.cursor())));
                }
            }
        }
        Err(ParseError::Unterminated {
            expected: self.syntax.nested_close,
            cursor: reader.cursor(),
        })
    }
}
