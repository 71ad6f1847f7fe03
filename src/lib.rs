//! # reqparse
//!
//! Turns the two forms in which HTTP requests usually get copied around into
//! one normalized [`RequestDescriptor`]:
//!
//! - raw request text, as shown by a browser's network inspector, and
//! - `curl` command lines, as produced by "Copy as cURL".
//!
//! Parsing is pure: no I/O, no shared state. Every entry point returns a
//! `Result`; use [`ParseReport`] when a flat `{..., success, error}` record is
//! more convenient.
//!
//! ## Request text
//!
//! ```rust
//! use reqparse::{parse_request_text, HttpMethod};
//!
//! let raw = "POST /api/users HTTP/1.1\nHost: api.example.com\n\n{\"a\":1}";
//! let request = parse_request_text(raw).expect("valid request");
//! assert_eq!(request.method, HttpMethod::POST);
//! assert_eq!(request.url, "http://api.example.com/api/users");
//! assert_eq!(request.body, "{\"a\":1}");
//! ```
//!
//! ## cURL
//!
//! ```rust
//! use reqparse::parse_curl;
//!
//! let request = parse_curl("curl -H 'Accept: text/html' https://example.com/a?b=1").unwrap();
//! assert_eq!(request.path, "/a?b=1");
//! assert_eq!(request.header_value("accept"), Some("text/html"));
//! ```

mod curl;
mod decode;
mod error;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use curl::{CurlParser, is_curl, tokenize};
pub use decode::{FormFields, RAW_KEY, decode_form_body, decode_query_string, encode_form_field};
pub use error::{ErrorKind, ParseError};
pub use output::{format_debug, format_http, format_json};
pub use parser::{ParserConfig, RequestTextParser, validate_request_text};
pub use types::{DEFAULT_PROTOCOL, Header, HeaderRow, HttpMethod, ParseReport, RequestDescriptor};

/// Which parser to run on an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// cURL if the input starts with `curl`, request text otherwise.
    #[default]
    Auto,
    /// Raw HTTP request text.
    Http,
    /// A cURL command line.
    Curl,
}

impl InputMode {
    /// Resolve [`InputMode::Auto`] against a concrete input.
    pub fn resolve(self, input: &str) -> Self {
        match self {
            Self::Auto if is_curl(input) => Self::Curl,
            Self::Auto => Self::Http,
            other => other,
        }
    }
}

/// Parse raw HTTP request text.
///
/// # Errors
///
/// Returns [`ParseError`] if no request line can be recovered.
pub fn parse_request_text(raw: &str) -> Result<RequestDescriptor, ParseError> {
    RequestTextParser::new().parse(raw)
}

/// Parse raw HTTP request text given as bytes.
///
/// # Errors
///
/// [`ParseError::Request`] if `data` is not UTF-8, otherwise as
/// [`parse_request_text`].
pub fn parse_request_bytes(data: &[u8]) -> Result<RequestDescriptor, ParseError> {
    let raw = std::str::from_utf8(data).map_err(|e| ParseError::Request(e.to_string()))?;
    parse_request_text(raw)
}

/// Parse a cURL command line.
///
/// # Errors
///
/// Returns [`ParseError`] if the command cannot be tokenized or has no URL.
pub fn parse_curl(command: &str) -> Result<RequestDescriptor, ParseError> {
    CurlParser::new().parse(command)
}

/// Parse either form, picking the parser with [`InputMode::Auto`].
///
/// # Errors
///
/// As [`parse_request_text`] or [`parse_curl`].
pub fn parse_input(input: &str) -> Result<RequestDescriptor, ParseError> {
    parse_input_with_config(input, InputMode::Auto, ParserConfig::default())
}

/// Parse either form with an explicit mode and custom [`ParserConfig`].
///
/// # Errors
///
/// As [`parse_request_text`] or [`parse_curl`], plus
/// [`ParseError::InputTooLarge`] when the configured limit is exceeded.
pub fn parse_input_with_config(
    input: &str,
    mode: InputMode,
    config: ParserConfig,
) -> Result<RequestDescriptor, ParseError> {
    match mode.resolve(input) {
        InputMode::Curl => CurlParser::with_config(config).parse(input),
        _ => RequestTextParser::with_config(config).parse(input),
    }
}
