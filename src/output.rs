use serde::Serialize;

use crate::decode::{decode_form_body, decode_query_string};
use crate::types::RequestDescriptor;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Serialize a [`RequestDescriptor`] or [`ParseReport`](crate::ParseReport)
/// to a JSON string.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render a [`RequestDescriptor`] in a human-readable debug format.
///
/// With `decode` set, the query string and a form-encoded body are listed
/// field by field as well.
pub fn format_debug(request: &RequestDescriptor, decode: bool) -> String {
    let mut out = String::with_capacity(256);

    out.push_str("=== HTTP Request ===\n");
    out.push_str(&format!("Method:   {}\n", request.method));
    out.push_str(&format!("Path:     {}\n", request.path));
    out.push_str(&format!("URL:      {}\n", request.url));
    out.push_str(&format!("Protocol: {}\n", request.protocol));

    out.push_str(&format!("\n--- Headers ({}) ---\n", request.headers.len()));
    for header in &request.headers {
        out.push_str(&format!("  {}: {}\n", header.name, header.value));
    }

    if decode {
        if let Some(query) = request.query() {
            let fields = decode_query_string(query);
            out.push_str(&format!("\n--- Query ({}) ---\n", fields.len()));
            for (key, value) in &fields {
                out.push_str(&format!("  {key} = {value}\n"));
            }
        }
    }

    if request.body.is_empty() {
        out.push_str("\n--- No Body ---\n");
    } else {
        out.push_str(&format!("\n--- Body ({} bytes) ---\n", request.body.len()));
        out.push_str(&request.body);
        out.push('\n');

        let is_form = request
            .header_value("content-type")
            .is_some_and(|v| v.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE));
        if decode && is_form {
            let fields = decode_form_body(&request.body);
            out.push_str(&format!("\n--- Form Fields ({}) ---\n", fields.len()));
            for (key, value) in &fields {
                out.push_str(&format!("  {key} = {value}\n"));
            }
        }
    }

    out.push_str("====================\n");
    out
}

/// Render a [`RequestDescriptor`] back into raw request text: request line,
/// headers, a blank line and the body.
///
/// Parsing the result gives back the same method, path and headers when the
/// path has no whitespace and the header names are non-empty and distinct.
/// The body comes back trimmed, so it only matches when it has no leading or
/// trailing whitespace.
pub fn format_http(request: &RequestDescriptor) -> String {
    let mut out = String::with_capacity(64 + request.headers.len() * 40 + request.body.len());

    out.push_str(&format!(
        "{} {} {}\n",
        request.method, request.path, request.protocol
    ));

    for header in &request.headers {
        out.push_str(&format!("{}: {}\n", header.name, header.value));
    }

    out.push('\n');
    out.push_str(&request.body);
    out
}
