use crate::types::{
    DecisionConfig, DecisionError, Detector, DetectorOutcome, DetectorScores, PerDetector,
    UnavailableDetector, VerdictRecord,
};


/// Fuses detector outcomes into a verdict under a fixed policy.
///
/// The engine holds only its validated configuration, so one instance can be
/// shared across threads and batches.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    cfg: DecisionConfig,
}

impl DecisionEngine {
    /// Validate `cfg` and build an engine around it.
    pub fn new(cfg: DecisionConfig) -> Result<Self, DecisionError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.cfg
    }

    /// Decide one pair.
    ///
    /// Unavailable detectors are left out: vote weights and confidence
    /// weights are renormalized over the detectors that scored, and the
    /// record is flagged `partial`. With no scored detector, or only
    /// detectors of zero vote weight, there is nothing to decide on and
    /// [`DecisionError::InsufficientSignal`] is returned.
    pub fn decide(&self, scores: &DetectorScores) -> Result<VerdictRecord, DecisionError> {
        let mut available: Vec<(Detector, f64)> = Vec::with_capacity(Detector::ALL.len());
        let mut unavailable = Vec::new();
        for detector in Detector::ALL {
            match scores.get(detector) {
                DetectorOutcome::Scored { score } => {
                    let score = *score;
                    if !(0.0..=1.0).contains(&score) {
                        return Err(DecisionError::InvalidScore { detector, score });
                    }
                    available.push((detector, score));
                }
                DetectorOutcome::Unavailable { reason } => {
                    unavailable.push(UnavailableDetector {
                        detector,
                        reason: reason.clone(),
                    });
                }
            }
        }

        if available.is_empty() {
            return Err(DecisionError::InsufficientSignal(
                "no detector produced a score".into(),
            ));
        }

        let total_weight: f64 = available
            .iter()
            .map(|&(d, _)| *self.cfg.vote_weights.get(d))
            .sum();
        if total_weight <= 0.0 {
            return Err(DecisionError::InsufficientSignal(
                "available detectors carry no vote weight".into(),
            ));
        }

        let mut votes: PerDetector<Option<bool>> = PerDetector::default();
        let mut weighted_votes = 0.0;
        for &(detector, score) in &available {
            let cast = score >= *self.cfg.thresholds.get(detector);
            *votes.get_mut(detector) = Some(cast);
            if cast {
                weighted_votes += *self.cfg.vote_weights.get(detector);
            }
        }
        let vote_ratio = weighted_votes / total_weight;
        let is_plagiarized = vote_ratio >= self.cfg.decision_threshold;

        let confidence_score = self.confidence(&available);

        let (min, max) = available
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, s)| {
                (lo.min(s), hi.max(s))
            });
        let score_spread = max - min;

        Ok(VerdictRecord {
            token_score: scores.token.score(),
            ast_score: scores.ast.score(),
            hash_score: scores.hash.score(),
            weighted_votes,
            total_weight,
            vote_ratio,
            is_plagiarized,
            confidence_score,
            agreement_level: self.cfg.agreement.classify(score_spread),
            score_spread,
            partial: !unavailable.is_empty(),
            votes,
            unavailable,
            config_version: self.cfg.version,
        })
    }

    fn confidence(&self, available: &[(Detector, f64)]) -> f64 {
        let weight_sum: f64 = available
            .iter()
            .map(|&(d, _)| *self.cfg.confidence_weights.get(d))
            .sum();
        let raw = if weight_sum > 0.0 {
            available
                .iter()
                .map(|&(d, s)| *self.cfg.confidence_weights.get(d) * s)
                .sum::<f64>()
                / weight_sum
        } else {
            // Every remaining detector has zero confidence weight.
            available.iter().map(|&(_, s)| s).sum::<f64>() / available.len() as f64
        };
        raw.clamp(0.0, 1.0)
    }
}
