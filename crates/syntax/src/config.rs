use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseErrorKind};

/// Parsing and lowering limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyntaxConfig {
    pub version: u32,
    /// Deepest syntax node accepted. Deeper sources fail with
    /// [`ParseErrorKind::TooDeep`] instead of exhausting the stack.
    pub max_depth: usize,
}

impl SyntaxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.version == 0 {
            return Err(ParseError::at_start(ParseErrorKind::InvalidConfig {
                message: "config version must be >= 1".into(),
            }));
        }
        if self.max_depth == 0 {
            return Err(ParseError::at_start(ParseErrorKind::InvalidConfig {
                message: "max_depth must be >= 1".into(),
            }));
        }
        Ok(())
    }
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_depth: 1000,
        }
    }
}
