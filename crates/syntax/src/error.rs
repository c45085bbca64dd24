use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a source text has no usable syntax tree.
///
/// `line` and `column` are 1-based; `column` counts bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseErrorKind {
    #[error("unexpected syntax")]
    UnexpectedSyntax,
    #[error("missing `{expected}`")]
    Missing { expected: String },
    #[error("nesting deeper than {limit}")]
    TooDeep { limit: usize },
    #[error("grammar unavailable: {message}")]
    Language { message: String },
    #[error("parser produced no tree")]
    NoTree,
    #[error("invalid syntax configuration: {message}")]
    InvalidConfig { message: String },
}

impl ParseError {
    pub(crate) fn at_start(kind: ParseErrorKind) -> Self {
        Self {
            line: 1,
            column: 1,
            kind,
        }
    }
}
