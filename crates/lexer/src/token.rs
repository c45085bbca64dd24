use serde::{Deserialize, Serialize};

/// Normalized value emitted for every identifier.
pub const IDENTIFIER_PLACEHOLDER: &str = "ID";
/// Normalized value emitted for every string literal.
pub const STRING_PLACEHOLDER: &str = "STR";
/// Normalized value emitted for every numeric literal.
pub const NUMBER_PLACEHOLDER: &str = "NUM";
/// Normalized value emitted for a run of unlexable input.
pub const ERROR_PLACEHOLDER: &str = "ERR";

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    StringLiteral,
    NumberLiteral,
    /// A contiguous run of input the lexer could not classify.
    Error,
}

impl TokenKind {
    /// True for kinds whose normalized text is a class placeholder rather
    /// than the original lexeme.
    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::NumberLiteral
                | TokenKind::Error
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::StringLiteral | TokenKind::NumberLiteral)
    }
}

/// A token with its UTF-8 byte offsets in the lexed text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Normalized value: a placeholder for identifiers, literals and error
    /// runs, the exact lexeme for keywords, operators and punctuation.
    pub text: String,
    /// Byte offset (inclusive) in the lexed text.
    pub start: usize,
    /// Byte offset (exclusive) in the lexed text.
    pub end: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    /// Original lexeme, recovered from the text the token was lexed from.
    ///
    /// Returns an empty string if `source` is not the text this token came
    /// from and the offsets fall outside it.
    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }

    /// Value used for content hashing.
    ///
    /// Literals hash by their raw lexeme so long identical literal blocks
    /// still match; everything else hashes by its normalized value so that
    /// renaming leaves the hash stream unchanged.
    pub fn hash_key<'a>(&'a self, source: &'a str) -> &'a str {
        if self.kind.is_literal() {
            let raw = self.lexeme(source);
            if !raw.is_empty() {
                return raw;
            }
        }
        self.text.as_str()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}
