use std::error::Error;
use std::fmt;

use decision::DecisionError;
use lexer::LexError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A source file rejected before any detector runs.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputError {
    #[error("{filename}: source is empty or whitespace only")]
    Empty { filename: String },
    #[error("{filename}: source is {bytes} bytes, limit is {limit}")]
    TooLarge {
        filename: String,
        bytes: usize,
        limit: usize,
    },
}

impl InputError {
    pub fn filename(&self) -> &str {
        match self {
            InputError::Empty { filename } | InputError::TooLarge { filename, .. } => filename,
        }
    }
}

/// Errors that can occur while comparing sources.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareError {
    Input(InputError),
    Lex(LexError),
    Decision(DecisionError),
    Config(String),
    WorkerPool(String),
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::Input(err) => write!(f, "input rejected: {err}"),
            CompareError::Lex(err) => write!(f, "lexing failed: {err}"),
            CompareError::Decision(err) => write!(f, "decision failed: {err}"),
            CompareError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            CompareError::WorkerPool(msg) => write!(f, "worker pool unavailable: {msg}"),
        }
    }
}

impl Error for CompareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CompareError::Input(err) => Some(err),
            CompareError::Lex(err) => Some(err),
            CompareError::Decision(err) => Some(err),
            CompareError::Config(_) | CompareError::WorkerPool(_) => None,
        }
    }
}

impl From<InputError> for CompareError {
    fn from(value: InputError) -> Self {
        CompareError::Input(value)
    }
}

impl From<LexError> for CompareError {
    fn from(value: LexError) -> Self {
        CompareError::Lex(value)
    }
}

impl From<DecisionError> for CompareError {
    fn from(value: DecisionError) -> Self {
        CompareError::Decision(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_wraps_inner_error() {
        let err = CompareError::from(InputError::Empty {
            filename: "a.py".into(),
        });
        assert_eq!(
            err.to_string(),
            "input rejected: a.py: source is empty or whitespace only"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn input_error_serializes_tagged() {
        let err = InputError::TooLarge {
            filename: "big.py".into(),
            bytes: 10,
            limit: 4,
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "too_large");
        assert_eq!(err.filename(), "big.py");
    }
}
