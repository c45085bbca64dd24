use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::overlap::OverlapMetric;

/// Settings shared by the token and structural detectors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimilarityConfig {
    pub version: u32,
    pub metric: OverlapMetric,
    /// Longest sequence scored with [`OverlapMetric::Lcs`]. Longer pairs are
    /// scored with n-gram Jaccard instead, since LCS is quadratic.
    pub max_lcs_len: usize,
    /// N-gram length used when a pair exceeds `max_lcs_len`.
    pub fallback_ngram: usize,
}

impl SimilarityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, metric: OverlapMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_max_lcs_len(mut self, max_lcs_len: usize) -> Self {
        self.max_lcs_len = max_lcs_len;
        self
    }

    pub fn with_fallback_ngram(mut self, n: usize) -> Self {
        self.fallback_ngram = n;
        self
    }

    /// Metric actually applied to sequences of these lengths.
    ///
    /// Depends only on the longer length, so it is the same both ways round.
    pub fn metric_for(&self, len_a: usize, len_b: usize) -> OverlapMetric {
        match self.metric {
            OverlapMetric::Lcs if len_a.max(len_b) > self.max_lcs_len => {
                OverlapMetric::NgramJaccard {
                    n: self.fallback_ngram,
                }
            }
            metric => metric,
        }
    }

    pub fn validate(&self) -> Result<(), SimilarityError> {
        if self.version == 0 {
            return Err(SimilarityError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if let OverlapMetric::NgramJaccard { n: 0 } = self.metric {
            return Err(SimilarityError::InvalidConfig(
                "ngram size must be >= 1".into(),
            ));
        }
        if self.fallback_ngram == 0 {
            return Err(SimilarityError::InvalidConfig(
                "fallback ngram size must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            version: 1,
            metric: OverlapMetric::Lcs,
            max_lcs_len: 5000,
            fallback_ngram: 3,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    #[error("invalid similarity configuration: {0}")]
    InvalidConfig(String),
}
