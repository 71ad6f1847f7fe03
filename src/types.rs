use serde::Serialize;
use std::fmt;

use crate::error::ParseError;

/// Protocol token used when the request line does not carry one.
pub const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// The HTTP methods a request line or `-X` flag may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
    CONNECT,
    TRACE,
}

impl HttpMethod {
    /// Parse a method token, ignoring ASCII case.
    ///
    /// Returns an error carrying the uppercased token when it is not on the
    /// allow-list.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "DELETE" => Ok(Self::DELETE),
            "PATCH" => Ok(Self::PATCH),
            "HEAD" => Ok(Self::HEAD),
            "OPTIONS" => Ok(Self::OPTIONS),
            "CONNECT" => Ok(Self::CONNECT),
            "TRACE" => Ok(Self::TRACE),
            _ => Err(ParseError::UnsupportedMethod(upper)),
        }
    }

    /// Return the method as a static string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::PATCH => "PATCH",
            Self::HEAD => "HEAD",
            Self::OPTIONS => "OPTIONS",
            Self::CONNECT => "CONNECT",
            Self::TRACE => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// A single header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Field name, original casing preserved.
    pub name: String,
    /// Field value, surrounding whitespace trimmed.
    pub value: String,
}

/// One row of a header table in a request editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRow {
    pub enabled: bool,
    pub name: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// RequestDescriptor
// ---------------------------------------------------------------------------

/// A request recovered from pasted HTTP text or a cURL command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    /// The request method.
    pub method: HttpMethod,
    /// Request path, possibly with `?query` and `#fragment`.
    pub path: String,
    /// Fully qualified URL when a host is known, otherwise the path.
    pub url: String,
    /// HTTP version token, e.g. `HTTP/1.1`.
    pub protocol: String,
    /// Header fields in the order first seen. Names are unique.
    pub headers: Vec<Header>,
    /// The body exactly as given.
    pub body: String,
}

impl RequestDescriptor {
    /// Look up a header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Return `true` if a header with this name exists (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.header_value(name).is_some()
    }

    /// The query component of [`path`](Self::path), without `?` and fragment.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.path.split_once('?')?;
        Some(rest.split_once('#').map_or(rest, |(query, _)| query))
    }

    /// Header table rows, all enabled.
    pub fn header_rows(&self) -> Vec<HeaderRow> {
        self.headers
            .iter()
            .map(|h| HeaderRow {
                enabled: true,
                name: h.name.clone(),
                value: h.value.clone(),
            })
            .collect()
    }
}

/// Insert a header, replacing the value of an existing entry with the exact
/// same name in place. Empty names are dropped.
pub(crate) fn set_header(headers: &mut Vec<Header>, name: &str, value: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    match headers.iter_mut().find(|h| h.name == name) {
        Some(existing) => existing.value = value.to_owned(),
        None => headers.push(Header {
            name: name.to_owned(),
            value: value.to_owned(),
        }),
    }
    true
}

// ---------------------------------------------------------------------------
// ParseReport
// ---------------------------------------------------------------------------

/// Flat view of a parse result with explicit `success` and `error` fields.
///
/// This is the record request editors and the CLI's JSON output consume. On
/// failure `method` is empty and every other field carries its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub method: String,
    pub path: String,
    pub url: String,
    pub protocol: String,
    pub headers: Vec<Header>,
    pub body: String,
    pub success: bool,
    pub error: String,
}

impl ParseReport {
    fn failed(error: &ParseError) -> Self {
        Self {
            method: String::new(),
            path: String::new(),
            url: String::new(),
            protocol: DEFAULT_PROTOCOL.to_owned(),
            headers: Vec::new(),
            body: String::new(),
            success: false,
            error: error.to_string(),
        }
    }
}

impl From<RequestDescriptor> for ParseReport {
    fn from(request: RequestDescriptor) -> Self {
        Self {
            method: request.method.as_str().to_owned(),
            path: request.path,
            url: request.url,
            protocol: request.protocol,
            headers: request.headers,
            body: request.body,
            success: true,
            error: String::new(),
        }
    }
}

impl From<Result<RequestDescriptor, ParseError>> for ParseReport {
    fn from(result: Result<RequestDescriptor, ParseError>) -> Self {
        match result {
            Ok(request) => request.into(),
            Err(e) => Self::failed(&e),
        }
    }
}
