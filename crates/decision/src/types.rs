use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three independent similarity detectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    /// Overlap of normalized token sequences.
    Token,
    /// Overlap of normalized syntax tree serializations.
    Ast,
    /// Jaccard over winnowed content fingerprints.
    Hash,
}

impl Detector {
    pub const ALL: [Detector; 3] = [Detector::Token, Detector::Ast, Detector::Hash];

    pub fn as_str(self) -> &'static str {
        match self {
            Detector::Token => "token",
            Detector::Ast => "ast",
            Detector::Hash => "hash",
        }
    }
}

impl std::fmt::Display for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PerDetector<T> {
    pub token: T,
    pub ast: T,
    pub hash: T,
}

impl<T> PerDetector<T> {
    pub fn new(token: T, ast: T, hash: T) -> Self {
        Self { token, ast, hash }
    }

    pub fn get(&self, detector: Detector) -> &T {
        match detector {
            Detector::Token => &self.token,
            Detector::Ast => &self.ast,
            Detector::Hash => &self.hash,
        }
    }

    pub fn get_mut(&mut self, detector: Detector) -> &mut T {
        match detector {
            Detector::Token => &mut self.token,
            Detector::Ast => &mut self.ast,
            Detector::Hash => &mut self.hash,
        }
    }
}

impl PerDetector<f64> {
    pub fn sum(&self) -> f64 {
        self.token + self.ast + self.hash
    }
}

/// Result of running one detector on one pair.
///
/// A detector that could not run says so; it never substitutes a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectorOutcome {
    Scored { score: f64 },
    Unavailable { reason: String },
}

impl DetectorOutcome {
    pub fn scored(score: f64) -> Self {
        DetectorOutcome::Scored { score }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        DetectorOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            DetectorOutcome::Scored { score } => Some(*score),
            DetectorOutcome::Unavailable { .. } => None,
        }
    }
}

/// Detector outcomes for one pair, as fed to the engine.
pub type DetectorScores = PerDetector<DetectorOutcome>;

/// Cut points on the spread (max - min) of available scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AgreementCutoffs {
    /// Spread at or below this is `strong` agreement.
    pub strong_max: f64,
    /// Spread at or below this (and above `strong_max`) is `moderate`.
    pub moderate_max: f64,
}

impl AgreementCutoffs {
    pub fn classify(&self, spread: f64) -> AgreementLevel {
        if spread <= self.strong_max {
            AgreementLevel::Strong
        } else if spread <= self.moderate_max {
            AgreementLevel::Moderate
        } else {
            AgreementLevel::Poor
        }
    }
}

impl Default for AgreementCutoffs {
    fn default() -> Self {
        Self {
            strong_max: 0.2,
            moderate_max: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    Strong,
    Moderate,
    Poor,
}

/// Decision policy. Immutable once handed to a [`DecisionEngine`].
///
/// [`DecisionEngine`]: crate::DecisionEngine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,
    /// Minimum score for a detector to cast its vote. Each in `[0, 1]`.
    pub thresholds: PerDetector<f64>,
    /// Weight a detector's vote carries.
    pub vote_weights: PerDetector<f64>,
    /// Weights of the continuous confidence estimate. Must sum to 1.0.
    pub confidence_weights: PerDetector<f64>,
    /// Fraction of the available vote weight needed to flag a pair.
    pub decision_threshold: f64,
    #[serde(default)]
    pub agreement: AgreementCutoffs,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl DecisionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, token: f64, ast: f64, hash: f64) -> Self {
        self.thresholds = PerDetector::new(token, ast, hash);
        self
    }

    pub fn with_vote_weights(mut self, token: f64, ast: f64, hash: f64) -> Self {
        self.vote_weights = PerDetector::new(token, ast, hash);
        self
    }

    pub fn with_confidence_weights(mut self, token: f64, ast: f64, hash: f64) -> Self {
        self.confidence_weights = PerDetector::new(token, ast, hash);
        self
    }

    pub fn with_decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }

    pub fn with_agreement(mut self, strong_max: f64, moderate_max: f64) -> Self {
        self.agreement = AgreementCutoffs {
            strong_max,
            moderate_max,
        };
        self
    }

    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.version == 0 {
            return Err(DecisionError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        for detector in Detector::ALL {
            let threshold = *self.thresholds.get(detector);
            if !is_unit(threshold) {
                return Err(DecisionError::InvalidConfig(format!(
                    "{detector} threshold must be between 0.0 and 1.0 (got {threshold})"
                )));
            }
            let weight = *self.vote_weights.get(detector);
            if !weight.is_finite() || weight < 0.0 {
                return Err(DecisionError::InvalidConfig(format!(
                    "{detector} vote weight must be a finite value >= 0.0 (got {weight})"
                )));
            }
            let cw = *self.confidence_weights.get(detector);
            if !is_unit(cw) {
                return Err(DecisionError::InvalidConfig(format!(
                    "{detector} confidence weight must be between 0.0 and 1.0 (got {cw})"
                )));
            }
        }
        if self.vote_weights.sum() <= 0.0 {
            return Err(DecisionError::InvalidConfig(
                "vote weights must not all be zero".into(),
            ));
        }
        let cw_sum = self.confidence_weights.sum();
        if (cw_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DecisionError::InvalidConfig(format!(
                "confidence weights must sum to 1.0 (got {cw_sum})"
            )));
        }
        if !is_unit(self.decision_threshold) {
            return Err(DecisionError::InvalidConfig(format!(
                "decision_threshold must be between 0.0 and 1.0 (got {})",
                self.decision_threshold
            )));
        }
        let AgreementCutoffs {
            strong_max,
            moderate_max,
        } = self.agreement;
        if !is_unit(strong_max) || !is_unit(moderate_max) || strong_max > moderate_max {
            return Err(DecisionError::InvalidConfig(format!(
                "agreement cut points must satisfy 0.0 <= strong_max <= moderate_max <= 1.0 \
                 (got {strong_max}, {moderate_max})"
            )));
        }
        Ok(())
    }
}

fn is_unit(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            version: 1,
            thresholds: PerDetector::new(0.70, 0.80, 0.60),
            vote_weights: PerDetector::new(1.0, 2.0, 1.5),
            confidence_weights: PerDetector::new(0.3, 0.4, 0.3),
            decision_threshold: 0.5,
            agreement: AgreementCutoffs::default(),
        }
    }
}

/// A detector left out of a verdict, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnavailableDetector {
    pub detector: Detector,
    pub reason: String,
}

/// Verdict for one pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerdictRecord {
    /// Raw detector scores; `None` when the detector was unavailable.
    pub token_score: Option<f64>,
    pub ast_score: Option<f64>,
    pub hash_score: Option<f64>,
    /// Sum of the weights of detectors that voted.
    pub weighted_votes: f64,
    /// Sum of the weights of available detectors.
    pub total_weight: f64,
    /// `weighted_votes / total_weight`.
    pub vote_ratio: f64,
    pub is_plagiarized: bool,
    /// Weighted score estimate in `[0, 1]`, independent of the vote.
    pub confidence_score: f64,
    pub agreement_level: AgreementLevel,
    /// `max - min` over available scores.
    pub score_spread: f64,
    /// True when at least one detector was unavailable.
    pub partial: bool,
    /// Whether each detector voted; `None` when unavailable.
    pub votes: PerDetector<Option<bool>>,
    pub unavailable: Vec<UnavailableDetector>,
    pub config_version: u32,
}

/// Errors produced by the decision layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecisionError {
    #[error("invalid decision config: {0}")]
    InvalidConfig(String),
    /// No verdict can be reached without inventing one.
    #[error("insufficient signal: {0}")]
    InsufficientSignal(String),
    #[error("{detector} score {score} is outside [0, 1]")]
    InvalidScore { detector: Detector, score: f64 },
}
