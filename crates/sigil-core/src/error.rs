//! # Error Types
//!
//! Failure kinds for the label engine:
//! - `SyntaxError` — lexical and grammar failures share one family.
//!   The message text is part of the public contract; callers match on it.
//! - `ValueTypeError` — a `ValueTerm` accessed as the wrong tag.
//! - `NodeTableError` — term interning failures (unsupported term kind,
//!   identifier generator failure).
//!
//! All of these are terminal for the operation that raised them.
//! Nothing is retried internally.

use thiserror::Error;

/// A label expression, attribute value or hierarchy failed to parse.
///
/// Covers both lexical errors (bad character, broken string, broken
/// escape) and grammar errors (unexpected end of input, wrong closing
/// bracket). The rendered message is exact and reproducible; source
/// position is carried separately when known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    /// Human-readable diagnostic. Exact text is part of the contract.
    pub message: String,
    /// 1-based line of the offending character, when known.
    pub line: Option<u32>,
    /// 1-based column of the offending character, when known.
    pub column: Option<u32>,
}

impl SyntaxError {
    /// A syntax error with no source position (grammar-level failures).
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// A syntax error located at a line and column (lexical failures).
    #[must_use]
    pub fn at(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

/// A `ValueTerm` accessor was called for the wrong tag.
///
/// Raised only by direct misuse of `ValueTerm::get_string` /
/// `ValueTerm::get_boolean`. The evaluator checks tags before branching
/// and never raises this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValueTypeError {
    /// `get_string` called on a boolean term.
    #[error("Not a string value")]
    NotString,

    /// `get_boolean` called on a string term.
    #[error("Not a boolean value")]
    NotBoolean,
}

/// Failure while interning a term into the trie node table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeTableError {
    /// The term is neither a URI nor a literal. This is a programming
    /// contract violation, not a data error.
    #[error("Node table can only intern URIs and literals: {0}")]
    UnsupportedTerm(String),

    /// The injected identifier generator failed.
    #[error("Identifier generator failed: {0}")]
    IdGenerator(String),
}

/// Failure while decoding a serialized blank-node label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The encoded form is not well-formed (missing marker, truncated
    /// or invalid escape, illegal character).
    #[error("Bad encoded label: {0}")]
    BadEncoding(String),
}
