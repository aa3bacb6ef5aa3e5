//! Codec Tests
//!
//! Tests for request and response encoding/decoding.

use std::io::Cursor;

use sockettable::protocol::{
    decode_request, decode_response, encode_message, encode_request, encode_response, read_line,
    read_request, read_response, write_request, write_response, Request, RequestType, Response,
};
use sockettable::TableError;

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_update_matches_wire_format() {
    let line = encode_request(&Request::update("test1", "42"));
    assert_eq!(line, r#"{"request": "UPDATE", "key": "test1", "value": "42"}"#);
}

#[test]
fn test_encode_get_carries_null_value() {
    let line = encode_request(&Request::get("test1"));
    assert_eq!(line, r#"{"request": "GET", "key": "test1", "value": null}"#);
}

#[test]
fn test_encode_getall() {
    let line = encode_message(RequestType::GetAll.as_str(), None, None);
    assert_eq!(line, r#"{"request": "GETALL", "key": null, "value": null}"#);
    assert_eq!(decode_request(&line).unwrap(), Request::GetAll);
}

#[test]
fn test_encode_response() {
    assert_eq!(
        encode_response(&Response::value("test1", "42")),
        r#"{"key": "test1", "value": "42"}"#
    );
    assert_eq!(
        encode_response(&Response::null(Some("test1".to_string()))),
        r#"{"key": "test1", "value": null}"#
    );
}

// =============================================================================
// Request Decoding Tests
// =============================================================================

#[test]
fn test_decode_literal_requests() {
    assert_eq!(
        decode_request(r#"{"request": "UPDATE", "key": "test1", "value": "42"}"#).unwrap(),
        Request::update("test1", "42")
    );
    assert_eq!(
        decode_request(r#"{"request": "GET", "key": "test1", "value": "null"}"#).unwrap(),
        Request::get("test1")
    );
    assert_eq!(
        decode_request(r#"{"request": "DELETE", "key": "test1", "value": "null"}"#).unwrap(),
        Request::delete("test1")
    );
}

#[test]
fn test_decode_tolerates_missing_value_field() {
    assert_eq!(
        decode_request(r#"{"request": "GET", "key": "k"}"#).unwrap(),
        Request::get("k")
    );
    assert_eq!(
        decode_request(r#"{"request": "DELETE", "key": "k"}"#).unwrap(),
        Request::delete("k")
    );
}

#[test]
fn test_decode_field_order_and_spacing_are_free() {
    let request = decode_request(r#"  {"value":"v","key" :  "k","request":"UPDATE"}  "#).unwrap();
    assert_eq!(request, Request::update("k", "v"));
}

#[test]
fn test_decode_bare_value_token() {
    let request = decode_request(r#"{"request": "UPDATE", "key": "n", "value": 3.5}"#).unwrap();
    assert_eq!(request, Request::update("n", "3.5"));
}

#[test]
fn test_decode_unknown_request_type() {
    let request = decode_request(r#"{"request": "PATCH", "key": "k", "value": "v"}"#).unwrap();
    assert_eq!(
        request,
        Request::Unsupported {
            request: "PATCH".to_string(),
            key: Some("k".to_string()),
        }
    );
    assert_eq!(request.request_type(), None);
}

#[test]
fn test_decode_rejects_missing_request_field() {
    let err = decode_request(r#"{"key": "test1", "value": "42"}"#).unwrap_err();
    assert!(matches!(err, TableError::Protocol(_)));
}

#[test]
fn test_decode_rejects_missing_required_fields() {
    assert!(decode_request(r#"{"request": "GET"}"#).is_err());
    assert!(decode_request(r#"{"request": "UPDATE", "key": "k"}"#).is_err());
    assert!(decode_request(r#"{"request": "UPDATE", "key": "k", "value": null}"#).is_err());
    assert!(decode_request(r#"{"request": "DELETE", "key": null}"#).is_err());
}

#[test]
fn test_decode_rejects_garbage() {
    for line in ["", "hello", "{", r#"{"request": "GET", "key": "k""#, "[1, 2]"] {
        assert!(decode_request(line).is_err(), "accepted {:?}", line);
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_alphabet_keys_and_values() {
    // Pairs drawn from letters, digits, '_', '-', '.', ' ' and ','
    let cases = [
        ("TEST_KEY1", "Value1"),
        ("TEST_KEY2", "Value1, Value2"),
        ("TEST_KEY3, TEST", "Value1"),
        ("TEST_KEY4, TEST", "Value1, Value2"),
        ("a.b-c", " leading and trailing "),
        ("0", "-1.5e3"),
    ];

    for (key, value) in cases {
        let decoded = decode_request(&encode_request(&Request::update(key, value))).unwrap();
        assert_eq!(decoded.key(), Some(key));
        assert_eq!(decoded.value(), Some(value));
    }
}

#[test]
fn test_round_trip_quotes_and_backslashes() {
    let key = r#"say "hi""#;
    let value = r#"C:\path\"quoted"\"#;
    let line = encode_request(&Request::update(key, value));

    assert!(!line.contains('\n'));
    assert_eq!(decode_request(&line).unwrap(), Request::update(key, value));
}

#[test]
fn test_round_trip_newlines_stay_on_one_line() {
    let response = Response::value("multi", "line one\nline two\r\n");
    let line = encode_response(&response);

    assert!(!line.contains('\n'));
    assert_eq!(decode_response(&line).unwrap(), response);
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_decode_null_response() {
    let response = decode_response(r#"{"key": "test1", "value": null}"#).unwrap();
    assert_eq!(response.key.as_deref(), Some("test1"));
    assert!(response.is_null());
}

#[test]
fn test_decode_response_quoted_null_is_a_string() {
    let response = decode_response(r#"{"key": "k", "value": "null"}"#).unwrap();
    assert_eq!(response.value.as_deref(), Some("null"));
}

#[test]
fn test_decode_response_requires_value_field() {
    assert!(decode_response(r#"{"key": "k"}"#).is_err());
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_write_then_read_request_over_stream() {
    let mut buf = Vec::new();
    write_request(&mut buf, &Request::update("k", "v")).unwrap();
    assert_eq!(buf.last(), Some(&b'\n'));

    let mut cursor = Cursor::new(buf);
    let request = read_request(&mut cursor, 1024).unwrap();
    assert_eq!(request, Some(Request::update("k", "v")));
}

#[test]
fn test_write_then_read_response_over_stream() {
    let mut buf = Vec::new();
    write_response(&mut buf, &Response::value("k", "v")).unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(read_response(&mut cursor, 1024).unwrap(), Response::value("k", "v"));
}

#[test]
fn test_read_line_empty_stream() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    assert_eq!(read_line(&mut cursor, 1024).unwrap(), None);

    let mut cursor = Cursor::new(Vec::<u8>::new());
    assert!(matches!(
        read_response(&mut cursor, 1024),
        Err(TableError::ConnectionClosed)
    ));
}

#[test]
fn test_read_line_strips_crlf_and_reads_one_line() {
    let mut cursor = Cursor::new(b"first\r\nsecond\n".to_vec());
    assert_eq!(read_line(&mut cursor, 1024).unwrap().as_deref(), Some("first"));
    assert_eq!(read_line(&mut cursor, 1024).unwrap().as_deref(), Some("second"));
    assert_eq!(read_line(&mut cursor, 1024).unwrap(), None);
}

#[test]
fn test_read_line_without_terminator() {
    let mut cursor = Cursor::new(b"no newline".to_vec());
    assert_eq!(read_line(&mut cursor, 1024).unwrap().as_deref(), Some("no newline"));
}

#[test]
fn test_read_line_enforces_limit() {
    let mut cursor = Cursor::new(b"12345\n".to_vec());
    assert_eq!(read_line(&mut cursor, 5).unwrap().as_deref(), Some("12345"));

    let mut cursor = Cursor::new(b"123456\n".to_vec());
    assert!(matches!(
        read_line(&mut cursor, 5),
        Err(TableError::MessageTooLong { limit: 5 })
    ));

    let mut cursor = Cursor::new(vec![b'x'; 10_000]);
    assert!(matches!(
        read_line(&mut cursor, 1024),
        Err(TableError::MessageTooLong { .. })
    ));
}

#[test]
fn test_read_line_rejects_invalid_utf8() {
    let mut cursor = Cursor::new(vec![0xff, 0xfe, b'\n']);
    assert!(matches!(read_line(&mut cursor, 1024), Err(TableError::Protocol(_))));
}
