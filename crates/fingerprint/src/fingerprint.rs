//! Fingerprint set types and set similarity.

use serde::{Deserialize, Serialize};

/// A winnowed k-gram hash and the index of its first token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub hash: u64,
    pub position: usize,
}

/// Fingerprints of one file, unique by hash and sorted by hash.
///
/// When winnowing selects the same hash at several positions only the
/// earliest position is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintSet {
    pub fingerprints: Vec<Fingerprint>,
    pub meta: FingerprintMeta,
}

/// How a fingerprint set was produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintMeta {
    /// Algorithm version owned by this crate.
    pub fingerprint_version: u16,
    pub algorithm_name: String,
    pub k: usize,
    pub w: usize,
    pub seed: u64,
    pub config_version: u32,
    pub token_count: usize,
    pub kgram_count: usize,
}

impl FingerprintSet {
    pub(crate) fn from_selected(mut selected: Vec<Fingerprint>, meta: FingerprintMeta) -> Self {
        selected.sort_unstable_by_key(|f| (f.hash, f.position));
        selected.dedup_by_key(|f| f.hash);
        Self {
            fingerprints: selected,
            meta,
        }
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.fingerprints.iter().map(|f| f.hash)
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.fingerprints
            .binary_search_by_key(&hash, |f| f.hash)
            .is_ok()
    }
}

/// Number of hash values present in both sets.
pub fn shared_count(a: &FingerprintSet, b: &FingerprintSet) -> usize {
    let (xs, ys) = (&a.fingerprints, &b.fingerprints);
    let (mut i, mut j, mut shared) = (0, 0, 0);
    while i < xs.len() && j < ys.len() {
        match xs[i].hash.cmp(&ys[j].hash) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
    }
    shared
}

/// Jaccard similarity over hash values. Two empty sets score 0.0.
pub fn jaccard(a: &FingerprintSet, b: &FingerprintSet) -> f64 {
    let union = a.len() + b.len();
    if union == 0 {
        return 0.0;
    }
    let shared = shared_count(a, b);
    shared as f64 / (union - shared) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> FingerprintMeta {
        FingerprintMeta {
            fingerprint_version: 1,
            algorithm_name: "test".into(),
            k: 5,
            w: 4,
            seed: 0,
            config_version: 1,
            token_count: 0,
            kgram_count: 0,
        }
    }

    fn set(hashes: &[u64]) -> FingerprintSet {
        let selected = hashes
            .iter()
            .enumerate()
            .map(|(position, &hash)| Fingerprint { hash, position })
            .collect();
        FingerprintSet::from_selected(selected, meta())
    }

    #[test]
    fn duplicates_keep_earliest_position() {
        let s = FingerprintSet::from_selected(
            vec![
                Fingerprint { hash: 9, position: 12 },
                Fingerprint { hash: 3, position: 4 },
                Fingerprint { hash: 9, position: 2 },
            ],
            meta(),
        );
        assert_eq!(
            s.fingerprints,
            vec![
                Fingerprint { hash: 3, position: 4 },
                Fingerprint { hash: 9, position: 2 },
            ]
        );
        assert!(s.contains(9));
        assert!(!s.contains(4));
    }

    #[test]
    fn jaccard_values() {
        let a = set(&[1, 2, 3, 4]);
        let b = set(&[3, 4, 5, 6]);
        assert_eq!(shared_count(&a, &b), 2);
        assert!((jaccard(&a, &b) - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
    }

    #[test]
    fn jaccard_empty_sets() {
        let empty = set(&[]);
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&empty, &set(&[1])), 0.0);
    }

    #[test]
    fn set_serializes() {
        let s = set(&[7, 1]);
        let json = serde_json::to_string(&s).unwrap();
        let back: FingerprintSet = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
