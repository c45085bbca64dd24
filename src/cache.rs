use std::sync::Arc;

use dashmap::DashMap;
use lexer::LexError;

use crate::unit::{content_digest, Artifacts, DeriveConfig};

/// Artifacts keyed by content digest, shared across pairs and threads.
///
/// Derivation runs outside the map lock. Two threads racing on the same new
/// text may both derive it; the first insert wins and both get that entry.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: DashMap<String, Arc<Artifacts>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached artifacts for `source`, deriving them on first sight.
    pub fn get_or_derive(
        &self,
        source: &str,
        cfg: &DeriveConfig,
    ) -> Result<Arc<Artifacts>, LexError> {
        let digest = content_digest(source);
        if let Some(hit) = self.entries.get(&digest) {
            return Ok(hit.clone());
        }
        let derived = Arc::new(Artifacts::derive(source, cfg)?);
        Ok(self
            .entries
            .entry(digest)
            .or_insert(derived)
            .clone())
    }

    pub fn get(&self, digest: &str) -> Option<Arc<Artifacts>> {
        self.entries.get(digest).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
