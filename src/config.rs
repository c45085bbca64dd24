//! YAML configuration for copydetect.
//!
//! A [`DetectionConfig`] is one flat set of options covering every stage.
//! Every field is optional in YAML; missing ones take their defaults. Unknown
//! keys are rejected so a misspelled option cannot silently fall back to a
//! default.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! token_threshold: 0.70
//! ast_threshold: 0.80
//! hash_threshold: 0.60
//! token_weight: 1.0
//! ast_weight: 2.0
//! hash_weight: 1.5
//! decision_threshold: 0.5
//! confidence_token_weight: 0.3
//! confidence_ast_weight: 0.4
//! confidence_hash_weight: 0.3
//! kgram_size: 5
//! winnowing_window: 4
//! min_tokens_for_hash_detector: 20
//! token_metric: lcs
//! max_lcs_len: 5000
//! max_syntax_depth: 1000
//! worker_threads: 4
//! ```

use std::fs;
use std::path::Path;

use decision::{AgreementCutoffs, DecisionConfig, PerDetector};
use fingerprint::FingerprintConfig;
use lexer::LexerConfig;
use serde::{Deserialize, Serialize};
use similarity::{OverlapMetric, SimilarityConfig};
use syntax::SyntaxConfig;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Overlap metric used by the token and AST detectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenMetric {
    #[default]
    Lcs,
    NgramJaccard,
}

/// All detection options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfig {
    #[serde(default = "default_token_threshold")]
    pub token_threshold: f64,
    #[serde(default = "default_ast_threshold")]
    pub ast_threshold: f64,
    #[serde(default = "default_hash_threshold")]
    pub hash_threshold: f64,

    #[serde(default = "default_token_weight")]
    pub token_weight: f64,
    #[serde(default = "default_ast_weight")]
    pub ast_weight: f64,
    #[serde(default = "default_hash_weight")]
    pub hash_weight: f64,

    /// Fraction of available vote weight needed to flag a pair.
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,

    #[serde(default = "default_confidence_token_weight")]
    pub confidence_token_weight: f64,
    #[serde(default = "default_confidence_ast_weight")]
    pub confidence_ast_weight: f64,
    #[serde(default = "default_confidence_hash_weight")]
    pub confidence_hash_weight: f64,

    #[serde(default = "default_kgram_size")]
    pub kgram_size: usize,
    #[serde(default = "default_winnowing_window")]
    pub winnowing_window: usize,
    /// Below this many tokens (or below `kgram_size`) in either file the hash
    /// detector is reported unavailable for the pair.
    #[serde(default = "default_min_tokens_for_hash_detector")]
    pub min_tokens_for_hash_detector: usize,

    /// Larger sources are rejected with an input error.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    /// Sequences longer than this are scored with `ngram_size`-gram Jaccard
    /// even under `token_metric: lcs`. LCS costs `|a| * |b|` steps.
    #[serde(default = "default_max_lcs_len")]
    pub max_lcs_len: usize,
    /// Syntax trees nested deeper than this make the AST detector unavailable.
    #[serde(default = "default_max_syntax_depth")]
    pub max_syntax_depth: usize,
    #[serde(default)]
    pub token_metric: TokenMetric,
    /// N-gram length for `ngram_jaccard` and for the LCS length fallback.
    #[serde(default = "default_ngram_size")]
    pub ngram_size: usize,
    #[serde(default = "default_hash_seed")]
    pub hash_seed: u64,
    #[serde(default = "true_value")]
    pub normalize_unicode: bool,
    #[serde(default = "default_agreement_strong_max")]
    pub agreement_strong_max: f64,
    #[serde(default = "default_agreement_moderate_max")]
    pub agreement_moderate_max: f64,
    /// Batch worker threads; `None` uses the global pool (one per core).
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl DetectionConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: DetectionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.decision_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.kgram_size == 0 {
            return Err(ConfigError::Validation(
                "kgram_size must be >= 1".into(),
            ));
        }
        if self.winnowing_window == 0 {
            return Err(ConfigError::Validation(
                "winnowing_window must be >= 1".into(),
            ));
        }
        self.fingerprint_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.ngram_size == 0 {
            return Err(ConfigError::Validation(
                "ngram_size must be >= 1".into(),
            ));
        }
        self.syntax_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.similarity_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.max_source_bytes == 0 {
            return Err(ConfigError::Validation(
                "max_source_bytes must be > 0".into(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::Validation(
                "worker_threads must be >= 1 when set".into(),
            ));
        }
        Ok(())
    }

    pub fn lexer_config(&self) -> LexerConfig {
        LexerConfig::new().with_normalize_unicode(self.normalize_unicode)
    }

    pub fn syntax_config(&self) -> SyntaxConfig {
        SyntaxConfig::new().with_max_depth(self.max_syntax_depth)
    }

    pub fn similarity_config(&self) -> SimilarityConfig {
        let metric = match self.token_metric {
            TokenMetric::Lcs => OverlapMetric::Lcs,
            TokenMetric::NgramJaccard => OverlapMetric::NgramJaccard { n: self.ngram_size },
        };
        SimilarityConfig::new()
            .with_metric(metric)
            .with_max_lcs_len(self.max_lcs_len)
            .with_fallback_ngram(self.ngram_size)
    }

    pub fn fingerprint_config(&self) -> FingerprintConfig {
        FingerprintConfig::new()
            .with_k(self.kgram_size)
            .with_w(self.winnowing_window)
            .with_seed(self.hash_seed)
    }

    pub fn decision_config(&self) -> DecisionConfig {
        DecisionConfig {
            thresholds: PerDetector::new(
                self.token_threshold,
                self.ast_threshold,
                self.hash_threshold,
            ),
            vote_weights: PerDetector::new(self.token_weight, self.ast_weight, self.hash_weight),
            confidence_weights: PerDetector::new(
                self.confidence_token_weight,
                self.confidence_ast_weight,
                self.confidence_hash_weight,
            ),
            decision_threshold: self.decision_threshold,
            agreement: AgreementCutoffs {
                strong_max: self.agreement_strong_max,
                moderate_max: self.agreement_moderate_max,
            },
            ..DecisionConfig::default()
        }
    }

    /// Token count below which the hash detector does not run.
    pub fn hash_detector_min_tokens(&self) -> usize {
        self.min_tokens_for_hash_detector.max(self.kgram_size)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            token_threshold: default_token_threshold(),
            ast_threshold: default_ast_threshold(),
            hash_threshold: default_hash_threshold(),
            token_weight: default_token_weight(),
            ast_weight: default_ast_weight(),
            hash_weight: default_hash_weight(),
            decision_threshold: default_decision_threshold(),
            confidence_token_weight: default_confidence_token_weight(),
            confidence_ast_weight: default_confidence_ast_weight(),
            confidence_hash_weight: default_confidence_hash_weight(),
            kgram_size: default_kgram_size(),
            winnowing_window: default_winnowing_window(),
            min_tokens_for_hash_detector: default_min_tokens_for_hash_detector(),
            max_source_bytes: default_max_source_bytes(),
            max_lcs_len: default_max_lcs_len(),
            max_syntax_depth: default_max_syntax_depth(),
            token_metric: TokenMetric::default(),
            ngram_size: default_ngram_size(),
            hash_seed: default_hash_seed(),
            normalize_unicode: true,
            agreement_strong_max: default_agreement_strong_max(),
            agreement_moderate_max: default_agreement_moderate_max(),
            worker_threads: None,
        }
    }
}

fn default_token_threshold() -> f64 {
    0.70
}
fn default_ast_threshold() -> f64 {
    0.80
}
fn default_hash_threshold() -> f64 {
    0.60
}
fn default_token_weight() -> f64 {
    1.0
}
fn default_ast_weight() -> f64 {
    2.0
}
fn default_hash_weight() -> f64 {
    1.5
}
fn default_decision_threshold() -> f64 {
    0.5
}
fn default_confidence_token_weight() -> f64 {
    0.3
}
fn default_confidence_ast_weight() -> f64 {
    0.4
}
fn default_confidence_hash_weight() -> f64 {
    0.3
}
fn default_kgram_size() -> usize {
    5
}
fn default_winnowing_window() -> usize {
    4
}
fn default_min_tokens_for_hash_detector() -> usize {
    20
}
fn default_max_source_bytes() -> usize {
    256 * 1024
}
fn default_max_lcs_len() -> usize {
    5000
}
fn default_max_syntax_depth() -> usize {
    1000
}
fn default_ngram_size() -> usize {
    3
}
fn default_hash_seed() -> u64 {
    0xF00D_BAAD_F00D_BAAD
}
fn default_agreement_strong_max() -> f64 {
    0.2
}
fn default_agreement_moderate_max() -> f64 {
    0.4
}
fn true_value() -> bool {
    true
}
