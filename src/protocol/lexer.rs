//! Message tokenizer
//!
//! Parses one flat object of the form
//!
//! ```text
//! object := '{' [ field ( ',' field )* ] '}'
//! field  := string ':' scalar
//! scalar := string | 'null' | bare
//! string := '"' ( char | '\' escape )* '"'
//! bare   := run of characters other than whitespace, ',', '}', '"', '{', '[', ']', ':'
//! ```
//!
//! Whitespace may appear between any two tokens. Bare scalars (numbers,
//! `true`, `false`) are returned verbatim as strings; `null` is returned as
//! `None`.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, TableError};

/// One `name: scalar` pair; `None` is the null sentinel
pub(crate) type Field = (String, Option<String>);

/// Parse a whole message into its fields, in wire order
pub(crate) fn parse_object(input: &str) -> Result<Vec<Field>> {
    let mut lexer = Lexer {
        chars: input.chars().peekable(),
    };
    let fields = lexer.object()?;
    lexer.skip_whitespace();
    if let Some(c) = lexer.chars.peek() {
        return Err(protocol_error(format!("trailing input after object: {:?}", c)));
    }
    Ok(fields)
}

/// Escape a string so it can sit between double quotes on one line
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn protocol_error(msg: String) -> TableError {
    TableError::Protocol(msg)
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(protocol_error(format!("expected {:?}, found {:?}", expected, c))),
            None => Err(protocol_error(format!("expected {:?}, found end of input", expected))),
        }
    }

    fn object(&mut self) -> Result<Vec<Field>> {
        self.expect('{')?;
        let mut fields = Vec::new();

        self.skip_whitespace();
        if self.chars.peek() == Some(&'}') {
            self.chars.next();
            return Ok(fields);
        }

        loop {
            self.skip_whitespace();
            let name = self.string()?;
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.scalar()?;
            fields.push((name, value));

            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => continue,
                Some('}') => return Ok(fields),
                Some(c) => {
                    return Err(protocol_error(format!("expected ',' or '}}', found {:?}", c)))
                }
                None => return Err(protocol_error("unterminated object".to_string())),
            }
        }
    }

    fn scalar(&mut self) -> Result<Option<String>> {
        if self.chars.peek() == Some(&'"') {
            return self.string().map(Some);
        }

        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, ',' | '}') {
                break;
            }
            if matches!(c, '"' | '{' | '[' | ']' | ':') {
                return Err(protocol_error(format!("unexpected {:?} in bare value", c)));
            }
            token.push(c);
            self.chars.next();
        }

        match token.as_str() {
            "" => Err(protocol_error("missing value".to_string())),
            "null" => Ok(None),
            _ => Ok(Some(token)),
        }
    }

    fn string(&mut self) -> Result<String> {
        match self.chars.next() {
            Some('"') => {}
            Some(c) => return Err(protocol_error(format!("expected '\"', found {:?}", c))),
            None => return Err(protocol_error("expected '\"', found end of input".to_string())),
        }

        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(out),
                Some('\\') => {
                    let unescaped = match self.chars.next() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(c) => return Err(protocol_error(format!("invalid escape \\{}", c))),
                        None => return Err(protocol_error("unterminated escape".to_string())),
                    };
                    out.push(unescaped);
                }
                Some(c @ ('\n' | '\r')) => {
                    return Err(protocol_error(format!("raw line break {:?} in string", c)))
                }
                Some(c) => out.push(c),
                None => return Err(protocol_error("unterminated string".to_string())),
            }
        }
    }
}
