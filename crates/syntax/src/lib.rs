//! Copydetect syntax layer.
//!
//! Parses Python with the tree-sitter grammar and lowers the result into a
//! structural tree that carries no identifier names and no literal values.
//! Two files that differ only in naming, literal values, comments,
//! parenthesization or layout normalize to the same tree.
//!
//! A source with any syntax error has no tree: [`normalize_source`] returns a
//! [`ParseError`] with the position of the first problem instead of a partial
//! result.

mod config;
mod error;
mod normalize;
mod parse;

pub use crate::config::SyntaxConfig;
pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::normalize::{normalize, Label, LiteralKind, NameRole, NormalizedTree, Symbol, TreeNode};
pub use crate::parse::{parse_source, SyntaxNode};

/// Parse and normalize in one step.
pub fn normalize_source(source: &str, cfg: &SyntaxConfig) -> Result<NormalizedTree, ParseError> {
    let module = parse_source(source, cfg)?;
    Ok(normalize(&module))
}
