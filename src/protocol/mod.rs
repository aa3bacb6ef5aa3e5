//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! Line-delimited, JSON-like text. Each connection carries exactly one
//! request line and one response line.
//!
//! ### Request Format
//! ```text
//! {"request": "UPDATE", "key": "test1", "value": "42"}
//! ```
//!
//! ### Requests
//! - GET:    key
//! - UPDATE: key + value
//! - DELETE: key
//! - GETALL: none (answered with a null value)
//!
//! ### Response Format
//! ```text
//! {"key": "test1", "value": "42"}
//! {"key": "test1", "value": null}
//! ```

mod codec;
mod lexer;
mod request;
mod response;

pub use codec::{
    decode_request, decode_response, encode_message, encode_request, encode_response, read_line,
    read_request, read_response, write_line, write_request, write_response, KEY_FIELD, NULL,
    REQUEST_FIELD, VALUE_FIELD,
};
pub use request::{Request, RequestType};
pub use response::Response;
