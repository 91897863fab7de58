//! Cursor Reader
//!
//! Character cursor over the source text with O(1) checkpoints.
//! Positions are character offsets, not byte offsets.

use super::error::ParseError;

const ESCAPE: char = '\\';

/// A rewindable cursor over a selector string
#[derive(Debug, Clone)]
pub struct StringReader {
    chars: Vec<char>,
    cursor: usize,
}

impl StringReader {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            cursor: 0,
        }
    }

    /// Current position, usable as a checkpoint
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rewind (or advance) to a checkpoint
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.chars.len());
    }

    pub fn can_read(&self) -> bool {
        self.can_read_n(1)
    }

    pub fn can_read_n(&self, n: usize) -> bool {
        self.cursor + n <= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.cursor + offset).copied()
    }

    /// Whether the next character is `c`
    pub fn at(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        Some(c)
    }

    pub fn skip(&mut self) {
        if self.can_read() {
            self.cursor += 1;
        }
    }

    /// Consume `c` or fail with the position of whatever was there instead
    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == c => {
                self.cursor += 1;
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedCharacter {
                found,
                cursor: self.cursor,
            }),
            None => Err(ParseError::Unterminated {
                expected: c,
                cursor: self.cursor,
            }),
        }
    }

    /// Text between two positions
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        self.chars[start.min(end)..end].iter().collect()
    }

    pub fn remaining(&self) -> String {
        self.slice(self.cursor, self.chars.len())
    }

    /// Read while the predicate holds
    pub fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.cursor;
        while self.peek().is_some_and(&pred) {
            self.cursor += 1;
        }
        self.slice(start, self.cursor)
    }

    /// Read up to (not including) the first character in `stops`
    pub fn read_until_any(&mut self, stops: &[char]) -> String {
        self.read_while(|c| !stops.contains(&c))
    }

    /// Read an unquoted token made only of `is_unquoted_char` characters
    pub fn read_unquoted(&mut self) -> String {
        self.read_while(is_unquoted_char)
    }

    /// Read text up to `terminator`, honouring backslash escapes.
    /// The terminator is consumed but not returned.
    pub fn read_until(&mut self, terminator: char) -> Result<String, ParseError> {
        let start = self.cursor;
        let mut out = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c != terminator && c != ESCAPE {
                    self.cursor -= 1;
                    return Err(ParseError::InvalidEscape {
                        found: c,
                        cursor: self.cursor,
                    });
                }
                out.push(c);
                escaped = false;
            } else if c == ESCAPE {
                escaped = true;
            } else if c == terminator {
                return Ok(out);
            } else {
                out.push(c);
            }
        }
        self.cursor = start;
        Err(ParseError::Unterminated {
            expected: terminator,
            cursor: self.chars.len(),
        })
    }

    /// Read a quoted string; the reader must sit on the opening quote
    pub fn read_quoted(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote) if is_quote(quote) => {
                self.cursor += 1;
                self.read_until(quote)
            }
            Some(found) => Err(ParseError::UnexpectedCharacter {
                found,
                cursor: self.cursor,
            }),
            None => Err(ParseError::PrematureEnd {
                cursor: self.cursor,
            }),
        }
    }

    /// Read either a quoted string or an unquoted token
    pub fn read_string(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(c) if is_quote(c) => self.read_quoted(),
            _ => Ok(self.read_unquoted()),
        }
    }
}

pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Characters allowed in a bare (unquoted) token
pub fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | ':' | '/' | '#')
}

/// Quote `text` unless it is a non-empty bare token
pub fn quote_if_needed(text: &str) -> String {
    if !text.is_empty() && text.chars().all(is_unquoted_char) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out.push('"');
    out
}
