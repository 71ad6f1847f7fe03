//! cURL command lines → [`RequestDescriptor`].
//!
//! The command is split into shell words with [`shlex`], then walked left to
//! right against a small flag table. Every flag in the table takes one
//! argument, given as the next word (`-H 'A: b'`), glued to a short flag
//! (`-H'A: b'`) or after `=` on a long flag (`--header='A: b'`). Later
//! occurrences overwrite earlier ones, except `-F` fields which accumulate.

use tracing::{debug, trace};

use crate::decode::encode_form_field;
use crate::error::ParseError;
use crate::parser::ParserConfig;
use crate::types::{DEFAULT_PROTOCOL, Header, HttpMethod, RequestDescriptor, set_header};

const CURL_CMD: &str = "curl";

/// Return `true` if `input` looks like a cURL invocation.
///
/// The first word must be `curl` in any case; `curling` or `curlx` is not.
pub fn is_curl(input: &str) -> bool {
    let input = input.trim_start();
    match input.get(..CURL_CMD.len()) {
        Some(head) if head.eq_ignore_ascii_case(CURL_CMD) => input[CURL_CMD.len()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Flag grammar
// ---------------------------------------------------------------------------

/// What a recognized flag does with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SetMethod,
    AddHeader,
    /// Store a header whose name is implied by the flag (`-A`, `-b`, `-e`).
    NamedHeader(&'static str),
    SetBody,
    AddFormField,
    SetUrl,
    /// Consume the argument without using it, so it is never mistaken for
    /// the URL.
    Skip,
}

#[derive(Debug)]
struct FlagSpec {
    short: Option<char>,
    long: &'static [&'static str],
    action: Action,
}

impl FlagSpec {
    fn matches(&self, token: &str) -> bool {
        self.long.contains(&token) || self.short.is_some_and(|c| is_short(token, c))
    }
}

fn is_short(token: &str, letter: char) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next() == Some(letter) && chars.next().is_none()
}

#[rustfmt::skip]
const FLAGS: &[FlagSpec] = &[
    FlagSpec { short: Some('X'), long: &["--request"], action: Action::SetMethod },
    FlagSpec { short: Some('H'), long: &["--header"], action: Action::AddHeader },
    FlagSpec { short: Some('d'), long: &["--data", "--data-raw", "--data-binary", "--data-ascii"], action: Action::SetBody },
    // Stored verbatim; no encoding is applied.
    FlagSpec { short: None, long: &["--data-urlencode"], action: Action::SetBody },
    FlagSpec { short: Some('F'), long: &["--form"], action: Action::AddFormField },
    FlagSpec { short: Some('A'), long: &["--user-agent"], action: Action::NamedHeader("User-Agent") },
    FlagSpec { short: Some('b'), long: &["--cookie"], action: Action::NamedHeader("Cookie") },
    FlagSpec { short: Some('e'), long: &["--referer"], action: Action::NamedHeader("Referer") },
    FlagSpec { short: None, long: &["--url"], action: Action::SetUrl },
    FlagSpec { short: Some('o'), long: &["--output"], action: Action::Skip },
    FlagSpec { short: Some('u'), long: &["--user"], action: Action::Skip },
    FlagSpec { short: Some('x'), long: &["--proxy"], action: Action::Skip },
    FlagSpec { short: Some('m'), long: &["--max-time"], action: Action::Skip },
    FlagSpec { short: Some('w'), long: &["--write-out"], action: Action::Skip },
    FlagSpec { short: None, long: &["--connect-timeout"], action: Action::Skip },
];

fn lookup(token: &str) -> Option<&'static FlagSpec> {
    FLAGS.iter().find(|spec| spec.matches(token))
}

/// `-dVALUE` or `--name=VALUE`: the flag and its glued argument, with
/// surrounding quote characters stripped from the argument.
fn split_attached(token: &str) -> Option<(&'static FlagSpec, &str)> {
    let (spec, arg) = if token.starts_with("--") {
        let (name, value) = token.split_once('=')?;
        (FLAGS.iter().find(|spec| spec.long.contains(&name))?, value)
    } else {
        let rest = token.strip_prefix('-')?;
        let letter = rest.chars().next()?;
        let value = &rest[letter.len_utf8()..];
        if value.is_empty() {
            return None;
        }
        (FLAGS.iter().find(|spec| spec.short == Some(letter))?, value)
    };
    Some((spec, arg.trim_matches(|c| c == '"' || c == '\'')))
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split a command line into words, honoring quotes and backslash escapes.
///
/// Backslash line continuations are folded into spaces first. A word that
/// starts with `#` is kept as a word, not read as a comment.
///
/// # Errors
///
/// [`ParseError::Curl`] for unbalanced quotes or a trailing backslash.
pub fn tokenize(command: &str) -> Result<Vec<String>, ParseError> {
    let folded = command.replace("\\\r\n", " ").replace("\\\n", " ");
    shlex::split(&escape_comment_marks(&folded))
        .ok_or_else(|| ParseError::Curl("unbalanced quotes or dangling escape".into()))
}

/// Backslash-escape every unquoted `#` that begins a word.
fn escape_comment_marks(command: &str) -> String {
    let mut out = String::with_capacity(command.len());
    let mut quote: Option<char> = None;
    let mut word_start = true;
    let mut chars = command.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                word_start = false;
                continue;
            }
            (Some(_), _) => {}
            (None, '\'' | '"') => {
                quote = Some(c);
                word_start = false;
            }
            (None, '#') if word_start => {
                out.push('\\');
                word_start = false;
            }
            (None, c) => word_start = c.is_whitespace(),
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Accumulated effect of the flags seen so far.
#[derive(Debug, Default)]
struct CurlState {
    method: Option<String>,
    url: Option<String>,
    headers: Vec<Header>,
    body: String,
    positionals: Vec<String>,
}

impl CurlState {
    fn apply(&mut self, action: Action, arg: &str) {
        match action {
            Action::SetMethod => self.method = Some(arg.to_owned()),
            Action::AddHeader => match arg.split_once(':') {
                Some((name, value)) => {
                    set_header(&mut self.headers, name.trim(), value.trim());
                }
                None => trace!(arg, "ignoring header without colon"),
            },
            Action::NamedHeader(name) => {
                set_header(&mut self.headers, name, arg.trim());
            }
            Action::SetBody => self.body = arg.to_owned(),
            Action::AddFormField => match arg.split_once('=') {
                Some((key, value)) => {
                    if !self.body.is_empty() {
                        self.body.push('&');
                    }
                    self.body.push_str(&encode_form_field(key, value));
                }
                None => trace!(arg, "ignoring form field without '='"),
            },
            Action::SetUrl if arg.is_empty() => trace!("ignoring empty --url"),
            Action::SetUrl => self.url = Some(arg.to_owned()),
            Action::Skip => trace!(arg, "skipping flag argument"),
        }
    }

    /// Fallback when neither `curl URL` nor `--url` named one: the first bare
    /// word with an http(s) scheme, else the first that looks like
    /// `host/path`.
    fn guess_url(&self) -> Option<String> {
        self.positionals
            .iter()
            .find(|t| t.contains("http://") || t.contains("https://"))
            .or_else(|| {
                self.positionals
                    .iter()
                    .find(|t| t.contains('.') && t.contains('/'))
            })
            .cloned()
    }
}

/// Parser for cURL command lines, e.g. from a browser's "Copy as cURL".
///
/// ```rust
/// use reqparse::{CurlParser, HttpMethod};
///
/// let request = CurlParser::new()
///     .parse(r#"curl -d '{"a":1}' https://api.example.com/items"#)
///     .unwrap();
/// assert_eq!(request.method, HttpMethod::POST);
/// assert_eq!(request.header_value("content-type"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurlParser {
    config: ParserConfig,
}

impl CurlParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom settings.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a cURL command line into a [`RequestDescriptor`].
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingUrl`] when no URL can be found,
    /// [`ParseError::UnsupportedMethod`] for an unknown `-X` verb and
    /// [`ParseError::Curl`] when tokenizing fails.
    pub fn parse(&self, command: &str) -> Result<RequestDescriptor, ParseError> {
        self.config.check_len(command)?;

        let tokens = tokenize(command)?;
        let state = walk(&tokens);

        let url = match state.url.clone().or_else(|| state.guess_url()) {
            Some(url) => url,
            None => return Err(ParseError::MissingUrl),
        };
        let path = request_path(&url);

        let CurlState {
            method,
            mut headers,
            body,
            ..
        } = state;

        if !body.is_empty() && self.config.infer_content_type && !has_content_type(&headers) {
            let content_type = infer_content_type(&body);
            debug!(content_type, "inferred content type from body");
            set_header(&mut headers, "Content-Type", content_type);
        }

        let method = match method {
            Some(token) => HttpMethod::from_token(&token)?,
            None if !body.is_empty() && self.config.promote_body_to_post => HttpMethod::POST,
            None => HttpMethod::GET,
        };

        debug!(%method, url = %url, headers = headers.len(), "parsed curl command");

        Ok(RequestDescriptor {
            method,
            path,
            url,
            protocol: DEFAULT_PROTOCOL.to_owned(),
            headers,
            body,
        })
    }
}

fn walk(tokens: &[String]) -> CurlState {
    let mut state = CurlState::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        i += 1;

        if token == CURL_CMD {
            if let Some(next) = tokens
                .get(i)
                .filter(|t| !t.is_empty() && !t.starts_with('-'))
            {
                state.url = Some(next.clone());
                i += 1;
            }
            continue;
        }

        if let Some(spec) = lookup(token) {
            match tokens.get(i) {
                Some(arg) => {
                    state.apply(spec.action, arg);
                    i += 1;
                }
                None => trace!(token, "flag at end of command has no argument"),
            }
            continue;
        }

        if let Some((spec, arg)) = split_attached(token) {
            state.apply(spec.action, arg);
            continue;
        }

        if token.starts_with('-') {
            trace!(token, "ignoring unrecognized flag");
            continue;
        }

        state.positionals.push(token.to_owned());
    }

    state
}

/// Path plus `?query` and `#fragment` for absolute http(s) URLs, copied as
/// written; anything else is taken as a relative path.
///
/// The authority ends at the first `/`, `?` or `#`. An empty path becomes
/// `/` and an empty query or fragment is dropped.
fn request_path(url: &str) -> String {
    let Some(rest) = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    else {
        return url.to_owned();
    };

    let tail = rest.find(['/', '?', '#']).map_or("", |at| &rest[at..]);
    let (tail, fragment) = tail.split_once('#').unwrap_or((tail, ""));
    let (path, query) = tail.split_once('?').unwrap_or((tail, ""));

    let mut out = if path.is_empty() { "/".to_owned() } else { path.to_owned() };
    if !query.is_empty() {
        out.push('?');
        out.push_str(query);
    }
    if !fragment.is_empty() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn has_content_type(headers: &[Header]) -> bool {
    headers
        .iter()
        .any(|h| h.name.eq_ignore_ascii_case("content-type"))
}

fn infer_content_type(body: &str) -> &'static str {
    if body.starts_with('{') || body.starts_with('[') {
        "application/json"
    } else if body.starts_with('<') {
        "application/xml"
    } else {
        "application/x-www-form-urlencoded"
    }
}
