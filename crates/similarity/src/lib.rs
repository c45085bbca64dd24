//! Token and structural similarity.
//!
//! Both detectors reduce a file to a sequence (normalized token values, or
//! the depth-first symbols of the normalized tree) and score a pair with the
//! same overlap primitive. Scores are in `[0, 1]`, symmetric, and 0.0 when
//! either side is empty.
//!
//! ```
//! use lexer::tokenize;
//! use similarity::{token_similarity, SimilarityConfig};
//!
//! let a = tokenize("def f(x):\n    return x + 1\n");
//! let b = tokenize("def g(value):\n    return value + 2\n");
//! assert_eq!(token_similarity(&a, &b, &SimilarityConfig::default()), 1.0);
//! ```

mod config;
mod overlap;

use lexer::Token;
use syntax::{NormalizedTree, Symbol};

pub use crate::config::{SimilarityConfig, SimilarityError};
pub use crate::overlap::{lcs_len, sequence_similarity, OverlapMetric};

/// Similarity of two token streams over their normalized values.
///
/// The metric is [`SimilarityConfig::metric_for`] the two lengths.
pub fn token_similarity(a: &[Token], b: &[Token], cfg: &SimilarityConfig) -> f64 {
    let va: Vec<&str> = a.iter().map(|t| t.text.as_str()).collect();
    let vb: Vec<&str> = b.iter().map(|t| t.text.as_str()).collect();
    sequence_similarity(&va, &vb, cfg.metric_for(va.len(), vb.len()))
}

/// Similarity of two normalized trees over their symbol sequences.
pub fn tree_similarity(a: &NormalizedTree, b: &NormalizedTree, cfg: &SimilarityConfig) -> f64 {
    symbol_similarity(&a.symbols(), &b.symbols(), cfg)
}

/// Like [`tree_similarity`] for symbol sequences computed ahead of time.
pub fn symbol_similarity(a: &[Symbol], b: &[Symbol], cfg: &SimilarityConfig) -> f64 {
    sequence_similarity(a, b, cfg.metric_for(a.len(), b.len()))
}
