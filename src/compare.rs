use std::sync::Arc;
use std::time::Instant;

use decision::{DecisionEngine, DetectorOutcome, DetectorScores, PerDetector, VerdictRecord};
use fingerprint::{jaccard, shared_count};
use serde::{Deserialize, Serialize};
use similarity::{symbol_similarity, token_similarity, OverlapMetric, SimilarityConfig};
use tracing::{debug, info, warn, Level};

use crate::cache::ArtifactCache;
use crate::config::{ConfigError, DetectionConfig};
use crate::error::CompareError;
use crate::metrics::MetricsSpan;
use crate::unit::{DeriveConfig, SourceFile, SourceUnit};

/// Reason reported when either file of a pair has no syntax tree.
pub const REASON_PARSE_ERROR: &str = "parse_error";
/// Reason reported when either file is too short to fingerprint.
pub const REASON_INSUFFICIENT_TOKENS: &str = "insufficient_tokens";

/// Result of comparing one pair of sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairVerdict {
    pub left: String,
    pub right: String,
    /// Both sources have byte-identical text.
    pub identical_content: bool,
    /// Fingerprints present in both files, when the hash detector ran.
    pub shared_fingerprints: Option<usize>,
    /// Overlap metric the token detector applied. Long streams switch from
    /// LCS to n-gram Jaccard past [`DetectionConfig::max_lcs_len`].
    pub token_metric: OverlapMetric,
    /// Overlap metric the AST detector applied, when it ran.
    pub ast_metric: Option<OverlapMetric>,
    pub verdict: VerdictRecord,
}

/// Runs the three detectors and the decision engine under one
/// [`DetectionConfig`].
///
/// A comparator owns an [`ArtifactCache`], so sources seen in several calls
/// to [`Comparator::prepare`] are derived once. That cache lives as long as
/// the comparator and is never evicted; call `cache().clear()` between
/// unrelated workloads. [`Comparator::compare_batch`] uses a cache of its own
/// that is dropped with the batch. The comparator is `Sync` and meant to be
/// shared by reference across worker threads.
#[derive(Debug)]
pub struct Comparator {
    config: DetectionConfig,
    derive: DeriveConfig,
    similarity: SimilarityConfig,
    engine: DecisionEngine,
    cache: ArtifactCache,
}

impl Comparator {
    /// Validate `config` and build a comparator with an empty cache.
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = DecisionEngine::new(config.decision_config())
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(Self {
            derive: DeriveConfig {
                lexer: config.lexer_config(),
                syntax: config.syntax_config(),
                fingerprint: config.fingerprint_config(),
            },
            similarity: config.similarity_config(),
            engine,
            cache: ArtifactCache::new(),
            config,
        })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    /// Validate a source file and derive (or fetch) its artifacts through
    /// the comparator's own cache.
    pub fn prepare(&self, file: SourceFile) -> Result<SourceUnit, CompareError> {
        self.prepare_in(file, &self.cache)
    }

    /// Like [`Comparator::prepare`] with artifacts kept in `cache`.
    pub fn prepare_in(
        &self,
        file: SourceFile,
        cache: &ArtifactCache,
    ) -> Result<SourceUnit, CompareError> {
        let mut metrics = MetricsSpan::start();
        let start = Instant::now();
        match self.prepare_inner(file, cache) {
            Ok(unit) => {
                if let Some(span) = metrics.take() {
                    span.record_prepare(Ok(()));
                }
                if let Some(first) = unit.tokens().diagnostics.first() {
                    warn!(
                        filename = %unit.filename,
                        diagnostics = unit.tokens().diagnostics.len(),
                        first = %first,
                        "lex_diagnostics"
                    );
                }
                if let Some(err) = unit.artifacts.parse_error() {
                    warn!(
                        filename = %unit.filename,
                        error = %err,
                        "parse_failure"
                    );
                }
                debug!(
                    filename = %unit.filename,
                    digest = %unit.digest(),
                    tokens = unit.artifacts.token_count(),
                    lex_diagnostics = unit.tokens().diagnostics.len(),
                    elapsed_micros = start.elapsed().as_micros(),
                    "prepare_success"
                );
                Ok(unit)
            }
            Err(err) => {
                if let Some(span) = metrics.take() {
                    span.record_prepare(Err(err.clone()));
                }
                warn!(
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros(),
                    "prepare_failure"
                );
                Err(err)
            }
        }
    }

    fn prepare_inner(
        &self,
        file: SourceFile,
        cache: &ArtifactCache,
    ) -> Result<SourceUnit, CompareError> {
        file.check(self.config.max_source_bytes)?;
        let artifacts = cache.get_or_derive(&file.source_text, &self.derive)?;
        Ok(SourceUnit {
            filename: file.filename,
            encoding: file.encoding,
            source_text: Arc::from(file.source_text),
            artifacts,
        })
    }

    /// Score a pair with each detector.
    ///
    /// The AST detector is unavailable when either file failed to parse; the
    /// hash detector when either file has fewer tokens than
    /// [`DetectionConfig::hash_detector_min_tokens`].
    pub fn detector_scores(&self, left: &SourceUnit, right: &SourceUnit) -> DetectorScores {
        let (l, r) = (&left.artifacts, &right.artifacts);

        let token = DetectorOutcome::scored(token_similarity(
            &l.tokens.tokens,
            &r.tokens.tokens,
            &self.similarity,
        ));

        let ast = if l.tree.is_ok() && r.tree.is_ok() {
            DetectorOutcome::scored(symbol_similarity(&l.symbols, &r.symbols, &self.similarity))
        } else {
            DetectorOutcome::unavailable(REASON_PARSE_ERROR)
        };

        let min_tokens = self.config.hash_detector_min_tokens();
        let hash = if l.token_count() < min_tokens || r.token_count() < min_tokens {
            DetectorOutcome::unavailable(REASON_INSUFFICIENT_TOKENS)
        } else {
            match (&l.fingerprints, &r.fingerprints) {
                (Ok(a), Ok(b)) => DetectorOutcome::scored(jaccard(a, b)),
                (Err(err), _) | (_, Err(err)) => DetectorOutcome::unavailable(err.to_string()),
            }
        };

        PerDetector::new(token, ast, hash)
    }

    /// Compare two prepared sources.
    pub fn compare(
        &self,
        left: &SourceUnit,
        right: &SourceUnit,
    ) -> Result<PairVerdict, CompareError> {
        let span = tracing::span!(
            Level::INFO,
            "copydetect.compare",
            left = %left.filename,
            right = %right.filename
        );
        let _guard = span.enter();
        let mut metrics = MetricsSpan::start();
        let start = Instant::now();

        let scores = self.detector_scores(left, right);
        match self.engine.decide(&scores) {
            Ok(verdict) => {
                if let Some(span) = metrics.take() {
                    span.record_pair(Ok(()));
                }
                let shared_fingerprints = match (
                    &verdict.hash_score,
                    &left.artifacts.fingerprints,
                    &right.artifacts.fingerprints,
                ) {
                    (Some(_), Ok(a), Ok(b)) => Some(shared_count(a, b)),
                    _ => None,
                };
                let (l, r) = (&left.artifacts, &right.artifacts);
                let token_metric = self
                    .similarity
                    .metric_for(l.tokens.tokens.len(), r.tokens.tokens.len());
                let ast_metric = verdict
                    .ast_score
                    .map(|_| self.similarity.metric_for(l.symbols.len(), r.symbols.len()));
                info!(
                    is_plagiarized = verdict.is_plagiarized,
                    confidence = verdict.confidence_score,
                    vote_ratio = verdict.vote_ratio,
                    partial = verdict.partial,
                    token_metric = ?token_metric,
                    elapsed_micros = start.elapsed().as_micros(),
                    "compare_success"
                );
                Ok(PairVerdict {
                    left: left.filename.clone(),
                    right: right.filename.clone(),
                    identical_content: left.digest() == right.digest(),
                    shared_fingerprints,
                    token_metric,
                    ast_metric,
                    verdict,
                })
            }
            Err(err) => {
                let err = CompareError::from(err);
                if let Some(span) = metrics.take() {
                    span.record_pair(Err(err.clone()));
                }
                warn!(
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros(),
                    "compare_failure"
                );
                Err(err)
            }
        }
    }

    /// Prepare both files and compare them.
    pub fn compare_files(
        &self,
        left: SourceFile,
        right: SourceFile,
    ) -> Result<PairVerdict, CompareError> {
        let left = self.prepare(left)?;
        let right = self.prepare(right)?;
        self.compare(&left, &right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use decision::{Detector, DecisionError};

    const GRADES: &str = r#"
def average(scores):
    total = 0
    for s in scores:
        total += s
    if len(scores) == 0:
        return 0
    return total / len(scores)


def letter(avg):
    if avg >= 90:
        return "A"
    elif avg >= 80:
        return "B"
    return "C"
"#;

    fn comparator() -> Comparator {
        Comparator::new(DetectionConfig::default()).expect("default config is valid")
    }

    fn file(name: &str, text: &str) -> SourceFile {
        SourceFile::new(name, text)
    }

    #[test]
    fn identical_sources_score_one_everywhere() {
        let verdict = comparator()
            .compare_files(file("a.py", GRADES), file("b.py", GRADES))
            .unwrap();
        assert!(verdict.identical_content);
        assert_eq!(verdict.verdict.token_score, Some(1.0));
        assert_eq!(verdict.verdict.ast_score, Some(1.0));
        assert_eq!(verdict.verdict.hash_score, Some(1.0));
        assert!(verdict.verdict.is_plagiarized);
        assert!(!verdict.verdict.partial);
        assert!(verdict.shared_fingerprints.unwrap_or(0) > 0);
        assert_eq!(verdict.token_metric, OverlapMetric::Lcs);
        assert_eq!(verdict.ast_metric, Some(OverlapMetric::Lcs));
    }

    #[test]
    fn byte_order_mark_does_not_change_scores() {
        let with_bom = format!("\u{FEFF}{GRADES}");
        let verdict = comparator()
            .compare_files(file("a.py", GRADES), file("bom.py", &with_bom))
            .unwrap();
        assert!(!verdict.identical_content);
        assert_eq!(verdict.verdict.token_score, Some(1.0));
        assert_eq!(verdict.verdict.ast_score, Some(1.0));
        assert!(!verdict.verdict.partial);
    }

    #[test]
    fn parse_failure_marks_ast_unavailable() {
        let broken = GRADES.replace("def letter(avg):", "def letter(avg:");
        let verdict = comparator()
            .compare_files(file("a.py", GRADES), file("b.py", &broken))
            .unwrap();
        assert_eq!(verdict.verdict.ast_score, None);
        assert_eq!(verdict.ast_metric, None);
        assert!(verdict.verdict.partial);
        assert_eq!(verdict.verdict.unavailable[0].detector, Detector::Ast);
        assert_eq!(verdict.verdict.unavailable[0].reason, REASON_PARSE_ERROR);
        assert!(verdict.verdict.token_score.is_some());
    }

    #[test]
    fn short_sources_skip_hash_detector() {
        let verdict = comparator()
            .compare_files(file("a.py", "x = 1\n"), file("b.py", "y = 2\n"))
            .unwrap();
        assert_eq!(verdict.verdict.hash_score, None);
        assert_eq!(verdict.shared_fingerprints, None);
        assert_eq!(
            verdict.verdict.unavailable[0].reason,
            REASON_INSUFFICIENT_TOKENS
        );
        assert_eq!(verdict.verdict.token_score, Some(1.0));
        assert!(!verdict.identical_content);
    }

    #[test]
    fn empty_source_is_input_error() {
        let err = comparator()
            .compare_files(file("a.py", GRADES), file("blank.py", "\n\n   \n"))
            .unwrap_err();
        assert_eq!(
            err,
            CompareError::Input(InputError::Empty {
                filename: "blank.py".into()
            })
        );
    }

    #[test]
    fn comment_only_sources_have_no_signal_beyond_zero_scores() {
        let verdict = comparator()
            .compare_files(file("a.py", "# just a note\n"), file("b.py", GRADES))
            .unwrap();
        assert_eq!(verdict.verdict.token_score, Some(0.0));
        assert_eq!(verdict.verdict.ast_score, Some(0.0));
        assert!(!verdict.verdict.is_plagiarized);
    }

    #[test]
    fn unavailable_everywhere_is_insufficient_signal() {
        let cfg = DetectionConfig {
            token_weight: 0.0,
            ..DetectionConfig::default()
        };
        let cmp = Comparator::new(cfg).unwrap();
        let err = cmp
            .compare_files(file("a.py", "def f(:\n"), file("b.py", "x = 1\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            CompareError::Decision(DecisionError::InsufficientSignal(_))
        ));
    }

    #[test]
    fn cache_is_shared_between_pairs() {
        let cmp = comparator();
        let a = cmp.prepare(file("a.py", GRADES)).unwrap();
        let b = cmp.prepare(file("copy_of_a.py", GRADES)).unwrap();
        assert!(Arc::ptr_eq(&a.artifacts, &b.artifacts));
        assert_eq!(cmp.cache().len(), 1);
    }

    #[test]
    fn prepare_in_leaves_own_cache_untouched() {
        let cmp = comparator();
        let scratch = ArtifactCache::new();
        cmp.prepare_in(file("a.py", GRADES), &scratch).unwrap();
        assert_eq!(scratch.len(), 1);
        assert!(cmp.cache().is_empty());
    }
}
