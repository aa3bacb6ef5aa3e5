//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! One message per line, newline terminated.
//!
//! ### Request
//! ```text
//! {"request": "<GET|UPDATE|DELETE|GETALL>", "key": "<key>", "value": "<value>"}
//! ```
//!
//! ### Response
//! ```text
//! {"key": "<key>", "value": "<value>"}
//! ```
//!
//! A missing value is written as the bare word `null`. Strings are escaped
//! with `\"`, `\\`, `\n`, `\r` and `\t`, so any key or value survives a round
//! trip and a message never spans more than one line.

use std::io::{BufRead, Read, Write};

use super::lexer::{escape, parse_object, Field};
use super::{Request, RequestType, Response};
use crate::error::{Result, TableError};

/// Field names
pub const REQUEST_FIELD: &str = "request";
pub const KEY_FIELD: &str = "key";
pub const VALUE_FIELD: &str = "value";

/// Textual form of the null sentinel
pub const NULL: &str = "null";

// =============================================================================
// Encoding
// =============================================================================

fn quoted_or_null(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("\"{}\"", escape(v)),
        None => NULL.to_string(),
    }
}

/// Encode a request line from its parts (no trailing newline)
///
/// The value field is always present; requests without a value carry `null`.
pub fn encode_message(request: &str, key: Option<&str>, value: Option<&str>) -> String {
    format!(
        "{{\"{}\": \"{}\", \"{}\": {}, \"{}\": {}}}",
        REQUEST_FIELD,
        escape(request),
        KEY_FIELD,
        quoted_or_null(key),
        VALUE_FIELD,
        quoted_or_null(value)
    )
}

/// Encode a request (no trailing newline)
pub fn encode_request(request: &Request) -> String {
    encode_message(request.token(), request.key(), request.value())
}

/// Encode a response (no trailing newline)
pub fn encode_response(response: &Response) -> String {
    format!(
        "{{\"{}\": {}, \"{}\": {}}}",
        KEY_FIELD,
        quoted_or_null(response.key.as_deref()),
        VALUE_FIELD,
        quoted_or_null(response.value.as_deref())
    )
}

// =============================================================================
// Decoding
// =============================================================================

/// Last occurrence of a field: `None` if absent, `Some(None)` if null
fn field<'f>(fields: &'f [Field], name: &str) -> Option<Option<&'f str>> {
    fields
        .iter()
        .rev()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_deref())
}

fn required(fields: &[Field], name: &str, request: &str) -> Result<String> {
    match field(fields, name) {
        Some(Some(v)) => Ok(v.to_string()),
        Some(None) => Err(TableError::Protocol(format!(
            "{} request: {} is null",
            request, name
        ))),
        None => Err(TableError::Protocol(format!(
            "{} request: missing {}",
            request, name
        ))),
    }
}

/// Decode a request line
///
/// Unknown request tokens decode to [`Request::Unsupported`]; anything that
/// does not match the grammar, or lacks a field its request type needs, is a
/// `Protocol` error.
pub fn decode_request(line: &str) -> Result<Request> {
    let fields = parse_object(line)?;

    let token = match field(&fields, REQUEST_FIELD) {
        Some(Some(token)) => token,
        _ => {
            return Err(TableError::Protocol(
                "missing request field".to_string(),
            ))
        }
    };

    let request = match RequestType::from_token(token) {
        Some(RequestType::Get) => Request::Get {
            key: required(&fields, KEY_FIELD, token)?,
        },
        Some(RequestType::Update) => Request::Update {
            key: required(&fields, KEY_FIELD, token)?,
            value: required(&fields, VALUE_FIELD, token)?,
        },
        Some(RequestType::Delete) => Request::Delete {
            key: required(&fields, KEY_FIELD, token)?,
        },
        Some(RequestType::GetAll) => Request::GetAll,
        None => Request::Unsupported {
            request: token.to_string(),
            key: field(&fields, KEY_FIELD).flatten().map(str::to_string),
        },
    };

    Ok(request)
}

/// Decode a response line
///
/// The `value` field must be present (possibly `null`); `key` is optional.
pub fn decode_response(line: &str) -> Result<Response> {
    let fields = parse_object(line)?;

    let value = match field(&fields, VALUE_FIELD) {
        Some(v) => v.map(str::to_string),
        None => {
            return Err(TableError::Protocol(
                "response: missing value field".to_string(),
            ))
        }
    };
    let key = field(&fields, KEY_FIELD).flatten().map(str::to_string);

    Ok(Response { key, value })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one line of at most `limit` bytes (terminator excluded)
///
/// Returns `Ok(None)` on end-of-stream before any byte. Bytes followed by
/// end-of-stream without a newline count as a line.
pub fn read_line<R: BufRead>(reader: &mut R, limit: usize) -> Result<Option<String>> {
    let mut buf = Vec::new();
    // Room for the longest allowed line plus "\r\n"
    let cap = limit.saturating_add(2) as u64;
    let n = reader
        .by_ref()
        .take(cap)
        .read_until(b'\n', &mut buf)
        .map_err(|e| TableError::from_io(e, "reading message"))?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    if buf.len() > limit {
        return Err(TableError::MessageTooLong { limit });
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|e| TableError::Protocol(format!("message is not UTF-8: {}", e)))
}

/// Write `line` followed by a newline, then flush
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer
        .write_all(line.as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .and_then(|_| writer.flush())
        .map_err(|e| TableError::from_io(e, "writing message"))
}

/// Read a complete request from a stream
///
/// `Ok(None)` means the peer closed the stream without sending anything.
pub fn read_request<R: BufRead>(reader: &mut R, limit: usize) -> Result<Option<Request>> {
    match read_line(reader, limit)? {
        Some(line) => decode_request(&line).map(Some),
        None => Ok(None),
    }
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_line(writer, &encode_request(request))
}

/// Read a complete response from a stream
pub fn read_response<R: BufRead>(reader: &mut R, limit: usize) -> Result<Response> {
    match read_line(reader, limit)? {
        Some(line) => decode_response(&line),
        None => Err(TableError::ConnectionClosed),
    }
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_line(writer, &encode_response(response))
}
