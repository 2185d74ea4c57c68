//! Outcome and error types shared by every parser.

use thiserror::Error;

/// What a single matching step (or a whole parse) achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// At least one token was consumed.
    Matched,
    /// Nothing was consumed.
    NoMatch,
    /// A primitive asked to stop immediately (e.g. `--help`).
    ///
    /// Remaining tokens are left unprocessed and required-argument checks
    /// are skipped.
    ShortCircuit,
}

/// Which side of the contract was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The parser definition itself is malformed.
    Logic,
    /// The supplied arguments could not be parsed.
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Malformed parser definition, detected before any input is read.
    #[error("{0}")]
    Logic(String),

    /// Bad input at parse time.
    #[error("{0}")]
    Runtime(String),
}

impl ParseError {
    pub fn logic(msg: impl Into<String>) -> Self {
        Self::Logic(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Logic(msg) | Self::Runtime(msg) => msg.as_str(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Logic(_) => ErrorKind::Logic,
            Self::Runtime(_) => ErrorKind::Runtime,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Result reported by bound destinations and user callbacks.
pub type ParserResult = ParseResult<ParseOutcome>;

/// Normalises what a user callback returns into a [`ParserResult`].
///
/// Callbacks returning `()` always succeed with [`ParseOutcome::Matched`].
pub trait CallbackResult {
    fn into_parser_result(self) -> ParserResult;
}

impl CallbackResult for () {
    fn into_parser_result(self) -> ParserResult {
        Ok(ParseOutcome::Matched)
    }
}

impl CallbackResult for ParserResult {
    fn into_parser_result(self) -> ParserResult {
        self
    }
}
