//! # Copydetect decision engine (`decision`)
//!
//! ## Purpose
//!
//! Turns the three per-pair detector outcomes (token, AST, hash) into a
//! binary verdict plus a continuous confidence estimate.
//!
//! ## Rules
//!
//! 1. A detector casts a vote of its weight when its score reaches its
//!    threshold (inclusive).
//! 2. `weighted_votes` is the sum of cast weights, `total_weight` the sum of
//!    weights of detectors that produced a score.
//! 3. The pair is flagged when `weighted_votes / total_weight` reaches the
//!    decision threshold.
//! 4. `confidence_score` is the confidence-weighted mean of available
//!    scores, independent of the vote.
//! 5. `agreement_level` classifies the spread between the highest and the
//!    lowest available score.
//!
//! Detectors that could not run are reported as unavailable and excluded;
//! the verdict is then marked `partial`.
//!
//! ## Example Usage
//!
//! ```
//! use decision::{DecisionConfig, DecisionEngine, DetectorOutcome, PerDetector};
//!
//! let engine = DecisionEngine::new(DecisionConfig::default()).unwrap();
//! let verdict = engine
//!     .decide(&PerDetector::new(
//!         DetectorOutcome::scored(0.35),
//!         DetectorOutcome::scored(0.95),
//!         DetectorOutcome::scored(0.40),
//!     ))
//!     .unwrap();
//! assert!(!verdict.is_plagiarized);
//! assert_eq!(verdict.weighted_votes, 2.0);
//! ```

mod engine;
mod types;

pub use crate::engine::DecisionEngine;
pub use crate::types::{
    AgreementCutoffs, AgreementLevel, DecisionConfig, DecisionError, Detector, DetectorOutcome,
    DetectorScores, PerDetector, UnavailableDetector, VerdictRecord,
};
