//! Configuration for the lexer.
//!
//! The `version` field follows the same rule as every other stage config in
//! this workspace: any change that can alter the emitted token stream must
//! come with a version bump, so stored results stay explainable.

use serde::{Deserialize, Serialize};

use crate::error::LexError;

/// Lexer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LexerConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,
    /// Apply Unicode NFKC normalization before lexing.
    ///
    /// Python itself compares identifiers after NFKC, so `ﬁle` and `file`
    /// name the same variable. Token offsets refer to the normalized text.
    pub normalize_unicode: bool,
}

impl LexerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalize_unicode(mut self, normalize_unicode: bool) -> Self {
        self.normalize_unicode = normalize_unicode;
        self
    }

    pub fn validate(&self) -> Result<(), LexError> {
        if self.version == 0 {
            return Err(LexError::InvalidConfig {
                message: "config version must be >= 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = LexerConfig::default();
        assert_eq!(cfg.version, 1);
        assert!(cfg.normalize_unicode);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = LexerConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(LexError::InvalidConfig { .. })));
    }

    #[test]
    fn builder_toggles_normalization() {
        let cfg = LexerConfig::new().with_normalize_unicode(false);
        assert!(!cfg.normalize_unicode);
    }
}
