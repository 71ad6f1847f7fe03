use tracing::{debug, trace};

use crate::error::ParseError;
use crate::types::{DEFAULT_PROTOCOL, Header, HttpMethod, RequestDescriptor, set_header};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings shared by the request-text and cURL parsers.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum accepted input size in bytes (default: 10 MiB).
    pub max_input_len: usize,
    /// Add a `Content-Type` guessed from the body when a cURL command sends
    /// data without one (default: `true`).
    pub infer_content_type: bool,
    /// Turn a cURL `GET` carrying a body into a `POST` (default: `true`).
    pub promote_body_to_post: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_len: 10 * 1024 * 1024,
            infer_content_type: true,
            promote_body_to_post: true,
        }
    }
}

impl ParserConfig {
    pub(crate) fn check_len(&self, input: &str) -> Result<(), ParseError> {
        if input.len() > self.max_input_len {
            return Err(ParseError::InputTooLarge {
                size: input.len(),
                limit: self.max_input_len,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request text parser
// ---------------------------------------------------------------------------

/// Parser for HTTP request text as copied from a browser's network panel.
///
/// The input is forgiving: bare `\n` or `\r\n` line endings, an optional
/// protocol token, header lines without a colon (skipped) and a body that is
/// taken verbatim after trimming.
///
/// ```rust
/// use reqparse::RequestTextParser;
///
/// let parser = RequestTextParser::new();
/// let request = parser
///     .parse("GET /api/data HTTP/1.1\nHost: localhost:8000\n\n")
///     .unwrap();
/// assert_eq!(request.url, "http://localhost:8000/api/data");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestTextParser {
    config: ParserConfig,
}

impl RequestTextParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom settings.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse raw request text into a [`RequestDescriptor`].
    ///
    /// # Errors
    ///
    /// [`ParseError::EmptyRequest`] for blank input,
    /// [`ParseError::InvalidRequestLine`] when the first line is not
    /// `METHOD PATH [PROTOCOL]` with a known method.
    pub fn parse(&self, raw: &str) -> Result<RequestDescriptor, ParseError> {
        self.config.check_len(raw)?;

        let (header_section, body_section) = split_sections(raw);

        let header_section = header_section.trim();
        if header_section.is_empty() {
            return Err(ParseError::EmptyRequest);
        }
        let mut lines = header_section.split('\n');

        let request_line = lines.next().unwrap_or_default();
        let (method, path, protocol) =
            parse_request_line(request_line).ok_or(ParseError::InvalidRequestLine)?;

        let mut headers: Vec<Header> = Vec::new();
        let mut host: Option<String> = None;

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                trace!(line, "skipping header line without colon");
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if !set_header(&mut headers, name, value) {
                trace!(line, "skipping header line with empty name");
                continue;
            }
            if name.eq_ignore_ascii_case("host") && !value.is_empty() {
                host = Some(value.to_owned());
            }
        }

        let url = match &host {
            Some(host) => format!("{}://{host}{path}", scheme_for_host(host)),
            None => path.to_owned(),
        };

        debug!(%method, path, url = %url, headers = headers.len(), "parsed request text");

        Ok(RequestDescriptor {
            method,
            path: path.to_owned(),
            url,
            protocol: protocol.to_owned(),
            headers,
            body: body_section.trim().to_owned(),
        })
    }
}

/// Check that `raw` looks like a request before handing it to the parser.
///
/// Cheaper and more specific than a full parse: an unknown verb is reported
/// as [`ParseError::UnsupportedMethod`] rather than a generic request-line
/// failure.
///
/// # Errors
///
/// [`ParseError::EmptyRequest`], [`ParseError::InvalidRequestLine`] or
/// [`ParseError::UnsupportedMethod`].
pub fn validate_request_text(raw: &str) -> Result<(), ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseError::EmptyRequest);
    }
    let first_line = raw.split('\n').next().unwrap_or_default();
    let mut tokens = first_line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(method), Some(_)) => HttpMethod::from_token(method).map(|_| ()),
        _ => Err(ParseError::InvalidRequestLine),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split at the first blank line, preferring `\n\n` over `\r\n\r\n`.
fn split_sections(raw: &str) -> (&str, &str) {
    if let Some(sections) = raw.split_once("\n\n") {
        return sections;
    }
    if let Some(sections) = raw.split_once("\r\n\r\n") {
        trace!("split request text at CRLF blank line");
        return sections;
    }
    (raw, "")
}

/// `METHOD PATH [PROTOCOL]`; `None` when fewer than two tokens or the method
/// is unknown.
fn parse_request_line(line: &str) -> Option<(HttpMethod, &str, &str)> {
    let mut tokens = line.split_whitespace();
    let method = tokens.next()?;
    let path = tokens.next()?;
    let protocol = tokens.next().unwrap_or(DEFAULT_PROTOCOL);

    match HttpMethod::from_token(method) {
        Ok(method) => Some((method, path, protocol)),
        Err(e) => {
            debug!(error = %e, "rejecting request line");
            None
        }
    }
}

/// `https` when the host names port 443 or mentions `https`, else `http`.
fn scheme_for_host(host: &str) -> &'static str {
    if host.contains(":443") || host.to_ascii_lowercase().contains("https") {
        "https"
    } else {
        "http"
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_prefers_lf_blank_line() {
        assert_eq!(split_sections("a\n\nb\r\n\r\nc"), ("a", "b\r\n\r\nc"));
    }

    #[test]
    fn split_falls_back_to_crlf() {
        assert_eq!(split_sections("a\r\nb\r\n\r\nc"), ("a\r\nb", "c"));
    }

    #[test]
    fn split_without_blank_line_has_empty_body() {
        assert_eq!(split_sections("a\nb"), ("a\nb", ""));
    }

    #[test]
    fn request_line_defaults_protocol() {
        let (method, path, protocol) = parse_request_line("delete /x").unwrap();
        assert_eq!(method, HttpMethod::DELETE);
        assert_eq!(path, "/x");
        assert_eq!(protocol, "HTTP/1.1");
    }

    #[test]
    fn request_line_rejects_single_token() {
        assert!(parse_request_line("GET").is_none());
    }

    #[test]
    fn scheme_detection() {
        assert_eq!(scheme_for_host("example.com"), "http");
        assert_eq!(scheme_for_host("example.com:443"), "https");
        assert_eq!(scheme_for_host("HTTPS-gateway.local"), "https");
        assert_eq!(scheme_for_host("example.com:4430"), "https");
    }

    #[test]
    fn input_limit_enforced() {
        let parser = RequestTextParser::with_config(ParserConfig {
            max_input_len: 4,
            ..ParserConfig::default()
        });
        assert_eq!(
            parser.parse("GET / HTTP/1.1"),
            Err(ParseError::InputTooLarge { size: 14, limit: 4 })
        );
    }
}
