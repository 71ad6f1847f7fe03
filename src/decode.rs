//! Decoders for `application/x-www-form-urlencoded` bodies and query strings,
//! plus the encoder the cURL parser uses for `-F` fields.

use std::borrow::Cow;
use std::str::Utf8Error;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::debug;

/// Decoded `key → value` pairs in first-seen order, keys unique.
pub type FormFields = Vec<(String, String)>;

/// Key used when the input could not be decoded at all.
pub const RAW_KEY: &str = "raw";

/// Characters left as-is by [`encode_form_field`]: alphanumerics and `_.-~/`.
const FORM_FIELD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode one `-F key=value` field as `key=value`.
pub fn encode_form_field(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        utf8_percent_encode(key, FORM_FIELD),
        utf8_percent_encode(value, FORM_FIELD)
    )
}

/// Decode a form body (`a=1&b=x%20y`).
///
/// `+` is left alone. A pair without `=` maps to an empty value and a repeated
/// key overwrites the earlier value. Empty segments (`a=1&&b=2`, a leading or
/// trailing `&`) are skipped rather than read as an empty key. If any
/// component does not decode to UTF-8 the whole body comes back under
/// [`RAW_KEY`].
pub fn decode_form_body(body: &str) -> FormFields {
    try_decode(body, false, true).unwrap_or_else(|e| {
        debug!(error = %e, "form body is not decodable, keeping raw");
        vec![(RAW_KEY.to_owned(), body.to_owned())]
    })
}

/// Decode a query string (`q=a+b&page=2`).
///
/// `+` means space, blank values are kept and the first value of a repeated
/// key wins. Empty segments are skipped as in [`decode_form_body`].
/// Undecodable input comes back under [`RAW_KEY`].
pub fn decode_query_string(query: &str) -> FormFields {
    let query = query.strip_prefix('?').unwrap_or(query);
    try_decode(query, true, false).unwrap_or_else(|e| {
        debug!(error = %e, "query string is not decodable, keeping raw");
        vec![(RAW_KEY.to_owned(), query.to_owned())]
    })
}

fn try_decode(input: &str, plus_as_space: bool, last_wins: bool) -> Result<FormFields, Utf8Error> {
    let mut fields: FormFields = Vec::new();

    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key, plus_as_space)?;
        let value = decode_component(value, plus_as_space)?;

        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) if last_wins => existing.1 = value,
            Some(_) => {}
            None => fields.push((key, value)),
        }
    }

    Ok(fields)
}

fn decode_component(raw: &str, plus_as_space: bool) -> Result<String, Utf8Error> {
    let raw: Cow<'_, str> = if plus_as_space && raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    Ok(percent_decode_str(&raw).decode_utf8()?.into_owned())
}
