//! Structured tags
//!
//! A compact stringified-tag (SNBT) reader used for `nbt={...}` style values.
//! Selector code treats [`Tag`] as opaque: it only parses, compares and
//! prints it.

use std::collections::BTreeMap;
use std::fmt;

use super::error::ParseError;
use super::reader::{is_quote, StringReader};

/// A structured tag value
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<Tag>),
    /// Key order is irrelevant for equality
    Compound(BTreeMap<String, Tag>),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// Parses a structured tag starting at the reader's cursor
pub trait TagParser: Send + Sync {
    /// The reader sits on the compound's opening brace
    fn parse_compound(&self, reader: &mut StringReader) -> Result<Tag, ParseError>;
}

/// Default [`TagParser`] for stringified tags
#[derive(Debug, Clone, Copy, Default)]
pub struct SnbtParser;

impl TagParser for SnbtParser {
    fn parse_compound(&self, reader: &mut StringReader) -> Result<Tag, ParseError> {
        read_compound(reader)
    }
}

impl SnbtParser {
    /// Parse a complete tag from text; trailing input is an error
    pub fn parse_str(&self, text: &str) -> Result<Tag, ParseError> {
        let mut reader = StringReader::new(text);
        skip_ws(&mut reader);
        let tag = read_value(&mut reader)?;
        skip_ws(&mut reader);
        if reader.can_read() {
            return Err(invalid(&reader, "trailing data"));
        }
        Ok(tag)
    }
}

fn invalid(reader: &StringReader, message: &str) -> ParseError {
    ParseError::InvalidTag {
        message: message.to_string(),
        cursor: reader.cursor(),
    }
}

fn is_snbt_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

fn skip_ws(reader: &mut StringReader) {
    reader.read_while(char::is_whitespace);
}

fn expect(reader: &mut StringReader, c: char) -> Result<(), ParseError> {
    skip_ws(reader);
    if reader.at(c) {
        reader.skip();
        Ok(())
    } else {
        Err(invalid(reader, &format!("expected '{}'", c)))
    }
}

fn read_key(reader: &mut StringReader) -> Result<String, ParseError> {
    skip_ws(reader);
    let key = match reader.peek() {
        Some(c) if is_quote(c) => reader.read_quoted()?,
        _ => reader.read_while(is_snbt_char),
    };
    if key.is_empty() {
        return Err(invalid(reader, "expected key"));
    }
    Ok(key)
}

fn read_compound(reader: &mut StringReader) -> Result<Tag, ParseError> {
    expect(reader, '{')?;
    let mut entries = BTreeMap::new();
    skip_ws(reader);
    while !reader.at('}') {
        let key = read_key(reader)?;
        expect(reader, ':')?;
        skip_ws(reader);
        let value = read_value(reader)?;
        entries.insert(key, value);
        skip_ws(reader);
        if reader.at(',') {
            reader.skip();
            skip_ws(reader);
        } else if !reader.at('}') {
            return Err(invalid(reader, "expected ',' or '}'"));
        }
    }
    reader.skip();
    Ok(Tag::Compound(entries))
}

fn read_value(reader: &mut StringReader) -> Result<Tag, ParseError> {
    match reader.peek() {
        Some('{') => read_compound(reader),
        Some('[') => read_list_or_array(reader),
        Some(c) if is_quote(c) => Ok(Tag::String(reader.read_quoted()?)),
        Some(_) => {
            let token = reader.read_while(is_snbt_char);
            if token.is_empty() {
                return Err(invalid(reader, "expected value"));
            }
            Ok(type_token(&token))
        }
        None => Err(invalid(reader, "expected value")),
    }
}

fn read_list_or_array(reader: &mut StringReader) -> Result<Tag, ParseError> {
    expect(reader, '[')?;
    if reader.peek_at(1) == Some(';') {
        if let Some(kind) = reader.peek().filter(|c| matches!(c, 'B' | 'I' | 'L')) {
            reader.skip();
            reader.skip();
            return read_array(reader, kind);
        }
    }
    let mut items = Vec::new();
    for_each_element(reader, |reader| {
        items.push(read_value(reader)?);
        Ok(())
    })?;
    Ok(Tag::List(items))
}

fn read_array(reader: &mut StringReader, kind: char) -> Result<Tag, ParseError> {
    let mut items = Vec::new();
    for_each_element(reader, |reader| {
        let start = reader.cursor();
        let value = read_value(reader)?;
        items.push((value, start));
        Ok(())
    })?;
    let mismatch = |cursor: usize| ParseError::InvalidTag {
        message: format!("mixed element types in {} array", kind),
        cursor,
    };
    Ok(match kind {
        'B' => Tag::ByteArray(
            items
                .into_iter()
                .map(|(t, at)| match t {
                    Tag::Byte(v) => Ok(v),
                    _ => Err(mismatch(at)),
                })
                .collect::<Result<_, _>>()?,
        ),
        'I' => Tag::IntArray(
            items
                .into_iter()
                .map(|(t, at)| match t {
                    Tag::Int(v) => Ok(v),
                    _ => Err(mismatch(at)),
                })
                .collect::<Result<_, _>>()?,
        ),
        _ => Tag::LongArray(
            items
                .into_iter()
                .map(|(t, at)| match t {
                    Tag::Long(v) => Ok(v),
                    _ => Err(mismatch(at)),
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

/// Drive a comma-separated sequence up to and including `]`
fn for_each_element(
    reader: &mut StringReader,
    mut element: impl FnMut(&mut StringReader) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    skip_ws(reader);
    while !reader.at(']') {
        element(reader)?;
        skip_ws(reader);
        if reader.at(',') {
            reader.skip();
            skip_ws(reader);
        } else if !reader.at(']') {
            return Err(invalid(reader, "expected ',' or ']'"));
        }
    }
    reader.skip();
    Ok(())
}

fn is_decimal(body: &str) -> bool {
    !body.is_empty()
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && body.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_integer(body: &str) -> bool {
    let digits = body.strip_prefix(['-', '+']).unwrap_or(body);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Infer the numeric type of an unquoted token, falling back to a string
fn type_token(token: &str) -> Tag {
    match token {
        "true" => return Tag::Byte(1),
        "false" => return Tag::Byte(0),
        _ => {}
    }
    let (body, suffix) = token.split_at(token.len() - 1);
    let typed = match suffix.to_ascii_lowercase().as_str() {
        "b" if is_integer(body) => body.parse().ok().map(Tag::Byte),
        "s" if is_integer(body) => body.parse().ok().map(Tag::Short),
        "l" if is_integer(body) => body.parse().ok().map(Tag::Long),
        "f" if is_decimal(body) => body.parse().ok().map(Tag::Float),
        "d" if is_decimal(body) => body.parse().ok().map(Tag::Double),
        _ if is_integer(token) => token.parse().ok().map(Tag::Int),
        _ if is_decimal(token) && token.contains(['.', 'e', 'E']) => {
            token.parse().ok().map(Tag::Double)
        }
        _ => None,
    };
    typed.unwrap_or_else(|| Tag::String(token.to_string()))
}

fn write_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if !text.is_empty()
        && text.chars().all(is_snbt_char)
        && type_token(text) == Tag::String(text.to_string())
    {
        return f.write_str(text);
    }
    f.write_str("\"")?;
    for c in text.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

fn write_seq<T>(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    write!(f, "[{}", prefix)?;
    for (i, value) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        item(f, value)?;
    }
    f.write_str("]")
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Byte(v) => write!(f, "{}b", v),
            Tag::Short(v) => write!(f, "{}s", v),
            Tag::Int(v) => write!(f, "{}", v),
            Tag::Long(v) => write!(f, "{}L", v),
            Tag::Float(v) => write!(f, "{:?}f", v),
            Tag::Double(v) => write!(f, "{:?}d", v),
            Tag::String(s) => write_string(f, s),
            Tag::List(items) => write_seq(f, "", items, |f, t| write!(f, "{}", t)),
            Tag::Compound(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_string(f, key)?;
                    write!(f, ":{}", value)?;
                }
                f.write_str("}")
            }
            Tag::ByteArray(items) => write_seq(f, "B;", items, |f, v| write!(f, "{}b", v)),
            Tag::IntArray(items) => write_seq(f, "I;", items, |f, v| write!(f, "{}", v)),
            Tag::LongArray(items) => write_seq(f, "L;", items, |f, v| write!(f, "{}L", v)),
        }
    }
}
