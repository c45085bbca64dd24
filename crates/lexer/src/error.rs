use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while lexing.
///
/// Input problems never abort lexing: they are collected as diagnostics on
/// the [`TokenStream`](crate::TokenStream) next to a best-effort token
/// sequence. Only an invalid configuration is returned as an `Err`.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LexError {
    #[error("unlexable input at byte {offset} ({len} bytes)")]
    Unlexable { offset: usize, len: usize },
    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid lexer configuration: {message}")]
    InvalidConfig { message: String },
}
