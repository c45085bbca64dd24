//! Single-pass scanner over Python source.
//!
//! The scanner never stops early. Anything it cannot classify is folded into
//! one `Error` token per contiguous run, and the surrounding input is lexed
//! normally.

use crate::error::LexError;
use crate::token::{
    Token, TokenKind, ERROR_PLACEHOLDER, IDENTIFIER_PLACEHOLDER, NUMBER_PLACEHOLDER,
    STRING_PLACEHOLDER,
};

pub(crate) const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

// Longest lexemes first so the first prefix match is the maximal munch.
const SYMBOLS: &[(&str, TokenKind)] = &[
    ("**=", TokenKind::Operator),
    ("//=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    ("<<=", TokenKind::Operator),
    ("...", TokenKind::Punctuation),
    ("->", TokenKind::Operator),
    (":=", TokenKind::Operator),
    ("**", TokenKind::Operator),
    ("//", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("@=", TokenKind::Operator),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("@", TokenKind::Operator),
    ("&", TokenKind::Operator),
    ("|", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("~", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("=", TokenKind::Operator),
    ("(", TokenKind::Punctuation),
    (")", TokenKind::Punctuation),
    ("[", TokenKind::Punctuation),
    ("]", TokenKind::Punctuation),
    ("{", TokenKind::Punctuation),
    ("}", TokenKind::Punctuation),
    (",", TokenKind::Punctuation),
    (":", TokenKind::Punctuation),
    (";", TokenKind::Punctuation),
    (".", TokenKind::Punctuation),
];

const STRING_PREFIXES: &[&str] = &["", "r", "u", "b", "f", "br", "rb", "fr", "rf"];

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<LexError>,
    error_start: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            tokens: Vec::with_capacity(src.len() / 4 + 1),
            diagnostics: Vec::new(),
            error_start: None,
        }
    }

    pub(crate) fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            if ch.is_whitespace() {
                self.flush_error();
                self.pos += ch.len_utf8();
                continue;
            }
            if let Some(len) = line_continuation_len(rest) {
                self.flush_error();
                self.pos += len;
                continue;
            }
            if ch == '#' {
                self.flush_error();
                self.skip_comment();
                continue;
            }
            if let Some(prefix_len) = string_prefix_len(rest) {
                self.flush_error();
                self.scan_string(prefix_len);
                continue;
            }
            if is_ident_start(ch) {
                self.flush_error();
                self.scan_identifier();
                continue;
            }
            if ch.is_ascii_digit()
                || (ch == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
            {
                self.flush_error();
                self.scan_number();
                continue;
            }
            if let Some((lexeme, kind)) = match_symbol(rest) {
                self.flush_error();
                let start = self.pos;
                self.pos += lexeme.len();
                self.tokens.push(Token::new(kind, lexeme, start, self.pos));
                continue;
            }

            self.error_start.get_or_insert(self.pos);
            self.pos += ch.len_utf8();
        }
        self.flush_error();
        (self.tokens, self.diagnostics)
    }

    fn flush_error(&mut self) {
        if let Some(start) = self.error_start.take() {
            self.tokens.push(Token::new(
                TokenKind::Error,
                ERROR_PLACEHOLDER,
                start,
                self.pos,
            ));
            self.diagnostics.push(LexError::Unlexable {
                offset: start,
                len: self.pos - start,
            });
        }
    }

    fn skip_comment(&mut self) {
        match self.src[self.pos..].find('\n') {
            Some(offset) => self.pos += offset,
            None => self.pos = self.src.len(),
        }
    }

    fn scan_identifier(&mut self) {
        let start = self.pos;
        let rest = &self.src[start..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let word = &rest[..len];
        self.pos = start + len;

        if KEYWORDS.contains(&word) {
            self.tokens
                .push(Token::new(TokenKind::Keyword, word, start, self.pos));
        } else {
            self.tokens.push(Token::new(
                TokenKind::Identifier,
                IDENTIFIER_PLACEHOLDER,
                start,
                self.pos,
            ));
        }
    }

    fn scan_number(&mut self) {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut i = start;

        if bytes[i] == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'))
        {
            i += 2;
            while i < bytes.len() && (bytes[i].is_ascii_hexdigit() || bytes[i] == b'_') {
                i += 1;
            }
        } else {
            i = skip_digits(bytes, i);
            if bytes.get(i) == Some(&b'.') {
                i = skip_digits(bytes, i + 1);
            }
            if matches!(bytes.get(i), Some(b'e' | b'E')) {
                let mut j = i + 1;
                if matches!(bytes.get(j), Some(b'+' | b'-')) {
                    j += 1;
                }
                if bytes.get(j).is_some_and(|b| b.is_ascii_digit()) {
                    i = skip_digits(bytes, j);
                }
            }
        }
        if matches!(bytes.get(i), Some(b'j' | b'J')) {
            i += 1;
        }

        self.pos = i;
        self.tokens.push(Token::new(
            TokenKind::NumberLiteral,
            NUMBER_PLACEHOLDER,
            start,
            i,
        ));
    }

    fn scan_string(&mut self, prefix_len: usize) {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut i = start + prefix_len;
        let quote = bytes[i];
        let triple = bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote);
        i += if triple { 3 } else { 1 };

        let mut terminated = false;
        while i < bytes.len() {
            let b = bytes[i];
            if b == b'\\' {
                i += 2;
                continue;
            }
            if triple {
                if b == quote && bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote)
                {
                    i += 3;
                    terminated = true;
                    break;
                }
            } else if b == quote {
                i += 1;
                terminated = true;
                break;
            } else if b == b'\n' {
                break;
            }
            i += 1;
        }
        // Quotes, newlines and backslashes are ASCII, so `end` always lands
        // on a char boundary even when an escape skipped into a multibyte
        // sequence.
        let end = i.min(bytes.len());

        if !terminated {
            self.diagnostics
                .push(LexError::UnterminatedString { offset: start });
        }
        self.pos = end;
        self.tokens.push(Token::new(
            TokenKind::StringLiteral,
            STRING_PLACEHOLDER,
            start,
            end,
        ));
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        i += 1;
    }
    i
}

fn line_continuation_len(rest: &str) -> Option<usize> {
    if rest.starts_with("\\\n") {
        Some(2)
    } else if rest.starts_with("\\\r\n") {
        Some(3)
    } else {
        None
    }
}

/// Length of a string prefix (`r`, `rb`, `f`, ...) if `rest` starts a string
/// literal.
fn string_prefix_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut len = 0;
    while len < 2
        && len < bytes.len()
        && matches!(bytes[len], b'r' | b'R' | b'b' | b'B' | b'u' | b'U' | b'f' | b'F')
    {
        len += 1;
    }
    if !matches!(bytes.get(len), Some(b'\'' | b'"')) {
        return None;
    }
    let prefix = rest[..len].to_ascii_lowercase();
    STRING_PREFIXES
        .contains(&prefix.as_str())
        .then_some(len)
}

fn match_symbol(rest: &str) -> Option<(&'static str, TokenKind)> {
    SYMBOLS
        .iter()
        .find(|(lexeme, _)| rest.starts_with(lexeme))
        .copied()
}
