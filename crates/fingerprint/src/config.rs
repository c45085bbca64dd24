//! Configuration and error types for content fingerprinting.
//!
//! Fingerprinting is a pure function of `(tokens, config)`; nothing here reads
//! the environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters for k-gram hashing and winnowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Configuration schema version.
    ///
    /// Any change that can alter the selected fingerprints must bump this, so
    /// stored fingerprint sets remain comparable only with their own kind.
    pub version: u32,
    /// Tokens per k-gram.
    pub k: usize,
    /// Winnowing window, in consecutive k-gram hashes.
    pub w: usize,
    /// Seed for token hashing and the rolling-hash base.
    pub seed: u64,
}

impl FingerprintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the k-gram length. Larger k ignores short accidental matches but
    /// misses short copied fragments.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the winnowing window. Larger w keeps fewer fingerprints.
    pub fn with_w(mut self, w: usize) -> Self {
        self.w = w;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Shortest verbatim shared run, in tokens, that is guaranteed to
    /// produce at least one common fingerprint.
    pub fn guarantee_threshold(&self) -> usize {
        self.w + self.k - 1
    }

    pub fn validate(&self) -> Result<(), FingerprintError> {
        if self.version < 1 {
            return Err(FingerprintError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.k < 1 {
            return Err(FingerprintError::InvalidConfigK { k: self.k });
        }
        if self.w < 1 {
            return Err(FingerprintError::InvalidConfigW { w: self.w });
        }
        Ok(())
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            version: 1,
            k: 5,
            w: 4,
            seed: 0xF00D_BAAD_F00D_BAAD,
        }
    }
}

/// Errors returned by fingerprinting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("not enough tokens for k={k} (got {got})")]
    NotEnoughTokens { k: usize, got: usize },

    #[error("invalid config: k must be >= 1 (got {k})")]
    InvalidConfigK { k: usize },

    #[error("invalid config: w must be >= 1 (got {w})")]
    InvalidConfigW { w: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
