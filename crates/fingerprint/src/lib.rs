//! # Copydetect content fingerprinting
//!
//! Turns a token sequence into a compact set of content fingerprints and
//! compares two sets by Jaccard similarity.
//!
//! ## Pipeline
//!
//! 1.  **K-gram hashing**: every run of `k` consecutive tokens is hashed with a
//!     seeded polynomial rolling hash over per-token xxh3 hashes.
//! 2.  **Winnowing**: from every window of `w` consecutive k-gram hashes the
//!     minimum is selected (rightmost on ties). Any verbatim shared run of at
//!     least `w + k - 1` tokens therefore produces at least one common
//!     fingerprint in both files.
//! 3.  **Set**: selections are deduplicated by hash, keeping the earliest
//!     position.
//!
//! The output is a pure function of `(tokens, config)`.
//!
//! ```
//! use fingerprint::{fingerprint_tokens, jaccard, FingerprintConfig};
//!
//! let tokens = ["def", "ID", "(", "ID", ")", ":", "return", "ID", "+", "NUM"];
//! let cfg = FingerprintConfig::default();
//! let a = fingerprint_tokens(&tokens, &cfg).unwrap();
//! let b = fingerprint_tokens(&tokens, &cfg).unwrap();
//! assert_eq!(jaccard(&a, &b), 1.0);
//! ```

pub mod config;
pub mod fingerprint;
mod shingles;

pub use crate::config::{FingerprintConfig, FingerprintError};
pub use crate::fingerprint::{jaccard, shared_count, Fingerprint, FingerprintMeta, FingerprintSet};
pub use crate::shingles::{kgram_hashes, winnow};

/// Current fingerprint algorithm version.
pub const FINGERPRINT_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const FINGERPRINT_ALGORITHM: &str = "xxh3rolling_winnow_v1";

/// Fingerprint a token sequence.
///
/// Fails with [`FingerprintError::NotEnoughTokens`] when there are fewer than
/// `k` tokens, since no k-gram exists.
pub fn fingerprint_tokens<S>(
    tokens: &[S],
    cfg: &FingerprintConfig,
) -> Result<FingerprintSet, FingerprintError>
where
    S: AsRef<str>,
{
    cfg.validate()?;
    if tokens.len() < cfg.k {
        return Err(FingerprintError::NotEnoughTokens {
            k: cfg.k,
            got: tokens.len(),
        });
    }

    let hashes = kgram_hashes(tokens, cfg.k, cfg.seed);
    let selected = winnow(&hashes, cfg.w);

    Ok(FingerprintSet::from_selected(
        selected,
        FingerprintMeta {
            fingerprint_version: FINGERPRINT_VERSION,
            algorithm_name: FINGERPRINT_ALGORITHM.to_string(),
            k: cfg.k,
            w: cfg.w,
            seed: cfg.seed,
            config_version: cfg.version,
            token_count: tokens.len(),
            kgram_count: hashes.len(),
        },
    ))
}
