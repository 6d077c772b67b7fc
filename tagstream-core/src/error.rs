//! Error types.
//!
//! Every error is fatal to the component that raised it: the tokenizer stops
//! producing tokens and the tree builder or walker unwinds with the error.

use std::fmt;

use thiserror::Error;

use crate::tokenizer::ScanState;

/// Where in the input something happened.
///
/// `offset` is a 0-based code point index; `line` and `column` are 1-based and
/// only meant for humans (a tab counts as four columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {} (offset {})", self.line, self.column, self.offset)
    }
}

/// What went wrong during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// NUL, a surrogate, or a value above `U+10FFFF`.
    InvalidCodepoint(u32),
    /// A character the current grammar rule does not allow.
    UnexpectedChar,
    /// `<` followed by something that starts no known construct.
    MalformedMarkup,
    /// `?>` closing a tag that is not a declaration.
    DeclarationEndOnElement,
    /// An attribute key not followed by `=`.
    ExpectedEquals,
    /// An attribute value not starting with `"` or `'`.
    ExpectedQuote,
    /// An entity reference that is neither predefined nor numeric.
    UnknownEntity(String),
    /// Input ended inside a tag, comment, CDATA section or entity reference.
    UnexpectedEof,
}

impl ErrorKind {
    /// Short human-readable description.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidCodepoint(_) => "invalid code point",
            Self::UnexpectedChar => "unexpected character",
            Self::MalformedMarkup => "malformed markup",
            Self::DeclarationEndOnElement => "`?>` may only close a declaration",
            Self::ExpectedEquals => "expected `=`",
            Self::ExpectedQuote => "expected `\"` or `'`",
            Self::UnknownEntity(_) => "unknown entity",
            Self::UnexpectedEof => "unexpected end of input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCodepoint(code) => write!(f, "{} U+{:04X}", self.message(), code),
            Self::UnknownEntity(name) => write!(f, "{} `&{};`", self.message(), name),
            _ => f.write_str(self.message()),
        }
    }
}

/// A scanning failure with enough context to point at the culprit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{} at {position} while {state}", found_suffix(.found))]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub position: Position,
    /// The character under the cursor, if there was one.
    pub found: Option<char>,
    pub state: ScanState,
}

fn found_suffix(found: &Option<char>) -> String {
    match found {
        Some(c) => format!(" (found {c:?})"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A closing tag that does not match the innermost open tag.
    ///
    /// `expected` is `None` for a stray close with nothing open; `found` is
    /// `None` when input ended while `expected` was still open.
    #[error("{}", mismatch_message(.expected, .found, .offset))]
    TagMismatch {
        expected: Option<String>,
        found: Option<String>,
        offset: usize,
    },

    /// The source claimed `len` code points but had nothing at `index`.
    #[error("input reports {len} code points but has none at index {index}")]
    InvalidInput { index: usize, len: usize },

    #[error("tag nesting depth {depth} exceeds the limit of {limit}")]
    NestingTooDeep { depth: usize, limit: usize },
}

fn mismatch_message(expected: &Option<String>, found: &Option<String>, offset: &usize) -> String {
    match (expected, found) {
        (Some(open), Some(close)) => {
            format!("closing tag </{close}> at offset {offset} does not match open tag <{open}>")
        }
        (Some(open), None) => format!("input ended with <{open}> still open"),
        (None, Some(close)) => format!("closing tag </{close}> at offset {offset} has no open tag"),
        (None, None) => format!("unbalanced tags at offset {offset}"),
    }
}

impl Error {
    /// The syntax error inside, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
