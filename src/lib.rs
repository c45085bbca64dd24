//! Workspace umbrella crate for copydetect.
//!
//! Stitches the stage crates into one comparison API: a [`Comparator`]
//! prepares each source once (lexing, parsing, fingerprinting), scores pairs
//! with three independent detectors and fuses the scores into a
//! [`VerdictRecord`].
//!
//! | Detector | Sees through | Crate |
//! |----------|--------------|-------|
//! | token    | renaming, literal changes, layout, comments | `lexer`, `similarity` |
//! | AST      | the above plus parenthesization | `syntax`, `similarity` |
//! | hash     | nothing beyond token normalization; catches verbatim runs | `fingerprint` |
//!
//! ```
//! use copydetect::{Comparator, DetectionConfig, SourceFile};
//!
//! let cmp = Comparator::new(DetectionConfig::default()).unwrap();
//! let verdict = cmp
//!     .compare_files(
//!         SourceFile::new("a.py", "def area(w, h):\n    return w * h\n"),
//!         SourceFile::new("b.py", "def size(x, y):\n    return x * y\n"),
//!     )
//!     .unwrap();
//! assert_eq!(verdict.verdict.token_score, Some(1.0));
//! ```

mod batch;
mod cache;
mod compare;
pub mod config;
mod error;
mod metrics;
mod unit;

pub use crate::batch::{BatchReport, FileFailure, PairFailure};
pub use crate::cache::ArtifactCache;
pub use crate::compare::{Comparator, PairVerdict, REASON_INSUFFICIENT_TOKENS, REASON_PARSE_ERROR};
pub use crate::config::{ConfigError, DetectionConfig, TokenMetric};
pub use crate::error::{CompareError, InputError};
pub use crate::metrics::{set_compare_metrics, CompareMetrics};
pub use crate::unit::{
    content_digest, Artifacts, DeriveConfig, SourceFile, SourceUnit, ARTIFACT_VERSION,
    DEFAULT_ENCODING,
};

pub use decision::{
    AgreementLevel, Detector, DetectorOutcome, DetectorScores, PerDetector, UnavailableDetector,
    VerdictRecord,
};
pub use similarity::OverlapMetric;

/// Compare two sources under `config` with a throwaway comparator.
pub fn compare_sources(
    left: SourceFile,
    right: SourceFile,
    config: &DetectionConfig,
) -> Result<PairVerdict, CompareError> {
    let comparator = Comparator::new(config.clone())
        .map_err(|e| CompareError::Config(e.to_string()))?;
    comparator.compare_files(left, right)
}
