use std::sync::Arc;

use fingerprint::{fingerprint_tokens, FingerprintConfig, FingerprintError, FingerprintSet};
use lexer::{lex, LexError, LexerConfig, TokenStream};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use syntax::{normalize_source, NormalizedTree, ParseError, Symbol, SyntaxConfig};

use crate::error::InputError;

/// Bumped whenever derived artifacts change shape, so digests from different
/// derivation rules never collide in a cache.
pub const ARTIFACT_VERSION: u32 = 1;

/// Encoding label assumed when the caller does not give one.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// One decoded source file as handed in by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub filename: String,
    pub source_text: String,
    /// Label of the encoding the text was decoded from. Informational only.
    pub encoding: String,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source_text: source_text.into(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Reject sources no detector can say anything about.
    pub fn check(&self, max_bytes: usize) -> Result<(), InputError> {
        if self.source_text.len() > max_bytes {
            return Err(InputError::TooLarge {
                filename: self.filename.clone(),
                bytes: self.source_text.len(),
                limit: max_bytes,
            });
        }
        let body = self.source_text.strip_prefix('\u{FEFF}').unwrap_or(self.source_text.as_str());
        if body.trim().is_empty() {
            return Err(InputError::Empty {
                filename: self.filename.clone(),
            });
        }
        Ok(())
    }
}

/// Everything the detectors need from one source text, derived once.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Hex SHA-256 over the artifact version and the raw source text.
    pub digest: String,
    pub tokens: TokenStream,
    /// The normalized tree, or why the source has none.
    pub tree: Result<NormalizedTree, ParseError>,
    /// Depth-first symbols of `tree`; empty when parsing failed.
    pub symbols: Vec<Symbol>,
    /// Winnowed fingerprints, or why there are none.
    pub fingerprints: Result<FingerprintSet, FingerprintError>,
}

/// Stage configurations needed to derive [`Artifacts`].
#[derive(Debug, Clone)]
pub struct DeriveConfig {
    pub lexer: LexerConfig,
    pub syntax: SyntaxConfig,
    pub fingerprint: FingerprintConfig,
}

impl Artifacts {
    /// Lex, parse and fingerprint `source`.
    ///
    /// Parse and fingerprint failures are kept in the artifacts; only an
    /// invalid lexer configuration is an error.
    pub fn derive(source: &str, cfg: &DeriveConfig) -> Result<Self, LexError> {
        let digest = content_digest(source);
        let tokens = lex(source, &cfg.lexer)?;
        let tree = normalize_source(&tokens.text, &cfg.syntax);
        let symbols = match &tree {
            Ok(tree) => tree.symbols(),
            Err(_) => Vec::new(),
        };
        let fingerprints = fingerprint_tokens(&tokens.hash_keys(), &cfg.fingerprint);
        Ok(Self {
            digest,
            tokens,
            tree,
            symbols,
            fingerprints,
        })
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.tree.as_ref().err()
    }
}

/// A validated source file paired with its derived artifacts.
///
/// Cloning is cheap: artifacts are shared, and units built from identical
/// text through the same cache share one allocation.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub filename: String,
    pub encoding: String,
    pub source_text: Arc<str>,
    pub artifacts: Arc<Artifacts>,
}

impl SourceUnit {
    pub fn digest(&self) -> &str {
        &self.artifacts.digest
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.artifacts.tokens
    }
}

/// Hex SHA-256 over `ARTIFACT_VERSION || 0x00 || text`.
pub fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ARTIFACT_VERSION.to_be_bytes());
    hasher.update([0x00]);
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
