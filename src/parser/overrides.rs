//! Value overrides
//!
//! Readers that bypass kind detection for a specific parameter path.

use std::sync::Arc;

use super::error::ParseError;
use super::reader::StringReader;
use super::Parser;
use crate::structure::Value;

/// Reads one value starting at the reader's cursor
pub type Override =
    Arc<dyn Fn(&Parser, &mut StringReader) -> Result<Value, ParseError> + Send + Sync>;

/// Always read the value as a structured tag
pub fn force_tag()
-> impl Fn(&Parser, &mut StringReader) -> Result<Value, ParseError> + Send + Sync + 'static {
    |parser: &Parser, reader: &mut StringReader| parser.read_tag(reader)
}

/// Read raw text up to (not including) the first of `stops`
pub fn force_until(
    stops: impl IntoIterator<Item = char>,
) -> impl Fn(&Parser, &mut StringReader) -> Result<Value, ParseError> + Send + Sync + 'static {
    let stops: Vec<char> = stops.into_iter().collect();
    move |_: &Parser, reader: &mut StringReader| Ok(Value::string(reader.read_until_any(&stops)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ValueType;

    #[test]
    fn test_force_tag() {
        let read = force_tag();
        let mut reader = StringReader::new("{a:1b}]");
        let value = read(&Parser::new(), &mut reader).unwrap();
        assert_eq!(value.value_type(), ValueType::Nbt);
        assert_eq!(reader.peek(), Some(']'));
    }

    #[test]
    fn test_force_tag_fails_on_parameters() {
        let read = force_tag();
        let mut reader = StringReader::new("{a=1}");
        assert!(read(&Parser::new(), &mut reader).is_err());
    }

    #[test]
    fn test_force_until() {
        let read = force_until([',', ']']);
        let mut reader = StringReader::new("minecraft:stone[x],y");
        let value = read(&Parser::new(), &mut reader).unwrap();
        assert_eq!(value.as_str(), Some("minecraft:stone[x"));
        assert_eq!(reader.peek(), Some(']'));
    }
}
