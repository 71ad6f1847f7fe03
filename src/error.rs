use thiserror::Error;

/// Errors that can occur while turning request text or a cURL command into a
/// [`RequestDescriptor`](crate::RequestDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The request text is empty or only whitespace.
    #[error("empty request text")]
    EmptyRequest,
    /// The first line is not `METHOD PATH [PROTOCOL]` with a known method.
    #[error("cannot parse request line")]
    InvalidRequestLine,
    /// A method token that is not on the allow-list.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    /// No URL could be recovered from the cURL command.
    #[error("cannot extract URL from curl command")]
    MissingUrl,
    /// The input exceeds [`ParserConfig::max_input_len`](crate::ParserConfig).
    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Any other failure while parsing request text.
    #[error("parse failed: {0}")]
    Request(String),
    /// Any other failure while parsing a cURL command (tokenizer, URL).
    #[error("curl command parsing failed: {0}")]
    Curl(String),
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input lacks a recognizable request line or URL.
    Structural,
    /// Something else went wrong underneath (tokenizer, decoding, URL parser).
    Unexpected,
}

impl ParseError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyRequest
            | Self::InvalidRequestLine
            | Self::UnsupportedMethod(_)
            | Self::MissingUrl
            | Self::InputTooLarge { .. } => ErrorKind::Structural,
            Self::Request(_) | Self::Curl(_) => ErrorKind::Unexpected,
        }
    }
}
