//! Copydetect lexer.
//!
//! Turns Python source into a flat token stream where identifiers and
//! literals are replaced by class placeholders. Two files that differ only in
//! naming, literal values, comments or layout lex to the same sequence.
//!
//! ## What we do
//!
//! - A leading byte order mark (U+FEFF) is dropped
//! - Optional Unicode NFKC normalization first (on by default)
//! - Drop whitespace, indentation, line continuations and `#` comments
//! - Identifiers become `ID`, strings `STR`, numbers `NUM`
//! - Keywords, operators and punctuation keep their exact text
//! - Byte offsets into the lexed text are kept, so raw literal text can be
//!   recovered for content hashing
//!
//! ## Never fails on input
//!
//! Anything that does not lex is collapsed into one `ERR` token per run and
//! reported as a [`LexError`] diagnostic. Unterminated strings are closed at
//! the end of the line (or the file, for triple quotes) and reported too. Only
//! an invalid configuration makes [`lex`] return `Err`.

mod config;
mod error;
mod scan;
mod token;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

pub use crate::config::LexerConfig;
pub use crate::error::LexError;
pub use crate::token::{
    Token, TokenKind, ERROR_PLACEHOLDER, IDENTIFIER_PLACEHOLDER, NUMBER_PLACEHOLDER,
    STRING_PLACEHOLDER,
};

use crate::scan::Scanner;

/// Tokenize raw source without normalization or diagnostics.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).run().0
}

/// Result of lexing one source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenStream {
    /// The text the tokens were lexed from (NFKC-normalized when enabled).
    pub text: String,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexError>,
    pub lexer_version: u32,
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Normalized values in order.
    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Values fed to the content hasher: raw lexemes for literals, normalized
    /// values for everything else.
    pub fn hash_keys(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.hash_key(&self.text)).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lex `source` under `cfg`.
pub fn lex(source: &str, cfg: &LexerConfig) -> Result<TokenStream, LexError> {
    cfg.validate()?;

    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let text: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(source.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(source)
    };

    let (tokens, diagnostics) = Scanner::new(text.as_ref()).run();
    Ok(TokenStream {
        text: text.into_owned(),
        tokens,
        diagnostics,
        lexer_version: cfg.version,
    })
}
