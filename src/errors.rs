use std::io;
use thiserror::Error;

/// Reasons a raw request buffer could not be turned into a [`Request`](crate::Request).
///
/// None of these are recovered inside the engine: they surface to the connection
/// handler, which by default closes the connection without writing a response
/// (see [`ConnLimits::reply_bad_request`](crate::limits::ConnLimits::reply_bad_request)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty request")]
    EmptyInput,

    #[error("request has no header section")]
    MalformedRequest,

    #[error("request line needs a method, a target and a protocol version")]
    MalformedRequestLine,

    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("invalid header line: {0:?}")]
    MalformedHeader(String),

    #[error("invalid JSON body: {0}")]
    InvalidJsonBody(String),

    #[error("request is not valid UTF-8")]
    InvalidEncoding,

    #[error("request exceeds the {limit} byte read buffer")]
    RequestTooLarge { limit: usize },
}

/// Failure while serving one connection. Never fatal to the accept loop.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("socket operation timed out")]
    Timeout,
}

impl ServeError {
    /// The parse failure behind this error, if any.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            ServeError::Parse(err) => Some(err),
            _ => None,
        }
    }
}
