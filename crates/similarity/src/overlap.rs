//! Normalized overlap between two sequences.

use std::hash::Hash;

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

/// How two sequences are compared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlapMetric {
    /// `2 * LCS(a, b) / (|a| + |b|)`. Order-sensitive, tolerant of
    /// insertions and deletions.
    #[default]
    Lcs,
    /// Jaccard over the sets of contiguous `n`-grams. Tolerant of reordered
    /// blocks.
    NgramJaccard { n: usize },
}

/// Length of the longest common subsequence.
///
/// O(|a|·|b|) time, O(min(|a|, |b|)) memory.
pub fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; inner.len() + 1];
    let mut curr = vec![0usize; inner.len() + 1];
    for x in outer {
        for (j, y) in inner.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[inner.len()]
}

/// Similarity of two sequences in `[0, 1]`.
///
/// Symmetric in its arguments. An empty sequence on either side scores 0.0.
pub fn sequence_similarity<T: Eq + Hash>(a: &[T], b: &[T], metric: OverlapMetric) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    match metric {
        OverlapMetric::Lcs => {
            let lcs = lcs_len(a, b);
            (2 * lcs) as f64 / (a.len() + b.len()) as f64
        }
        OverlapMetric::NgramJaccard { n } => {
            let ga = ngrams(a, n.max(1));
            let gb = ngrams(b, n.max(1));
            let shared = ga.intersection(&gb).count();
            let union = ga.len() + gb.len() - shared;
            if union == 0 {
                0.0
            } else {
                shared as f64 / union as f64
            }
        }
    }
}

// A sequence shorter than `n` counts as a single gram of itself.
fn ngrams<T: Eq + Hash>(seq: &[T], n: usize) -> FxHashSet<&[T]> {
    if seq.len() < n {
        return std::iter::once(seq).collect();
    }
    seq.windows(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcs_classic_example() {
        let a: Vec<char> = "ABCBDAB".chars().collect();
        let b: Vec<char> = "BDCABA".chars().collect();
        assert_eq!(lcs_len(&a, &b), 4);
        assert_eq!(lcs_len(&b, &a), 4);
    }

    #[test]
    fn lcs_edge_cases() {
        let empty: [u8; 0] = [];
        assert_eq!(lcs_len(&empty, &[1u8, 2]), 0);
        assert_eq!(lcs_len(&[1, 2, 3], &[1, 2, 3]), 3);
        assert_eq!(lcs_len(&[1, 2, 3], &[4, 5, 6]), 0);
    }

    #[test]
    fn lcs_similarity_values() {
        let a = ["ID", "=", "NUM"];
        let b = ["ID", "=", "ID", "+", "NUM"];
        // LCS = 3, 2*3 / 8
        let s = sequence_similarity(&a, &b, OverlapMetric::Lcs);
        assert!((s - 0.75).abs() < 1e-12);
        assert_eq!(sequence_similarity(&a, &a, OverlapMetric::Lcs), 1.0);
    }

    #[test]
    fn empty_side_scores_zero() {
        let empty: [&str; 0] = [];
        for metric in [OverlapMetric::Lcs, OverlapMetric::NgramJaccard { n: 3 }] {
            assert_eq!(sequence_similarity(&empty, &empty, metric), 0.0);
            assert_eq!(sequence_similarity(&empty, &["ID"], metric), 0.0);
            assert_eq!(sequence_similarity(&["ID"], &empty, metric), 0.0);
        }
    }

    #[test]
    fn ngram_jaccard_values() {
        let metric = OverlapMetric::NgramJaccard { n: 2 };
        let a = [1, 2, 3, 4];
        let b = [3, 4, 1, 2];
        // grams a: 12 23 34, b: 34 41 12 -> shared 2, union 4
        assert!((sequence_similarity(&a, &b, metric) - 0.5).abs() < 1e-12);
        assert_eq!(sequence_similarity(&a, &a, metric), 1.0);
    }

    #[test]
    fn ngram_short_sequences_compare_whole() {
        let metric = OverlapMetric::NgramJaccard { n: 5 };
        assert_eq!(sequence_similarity(&[1, 2], &[1, 2], metric), 1.0);
        assert_eq!(sequence_similarity(&[1, 2], &[2, 1], metric), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = [1, 5, 2, 7, 3, 3, 9];
        let b = [5, 2, 2, 3, 9, 1];
        for metric in [OverlapMetric::Lcs, OverlapMetric::NgramJaccard { n: 2 }] {
            assert_eq!(
                sequence_similarity(&a, &b, metric),
                sequence_similarity(&b, &a, metric)
            );
        }
    }

    #[test]
    fn metric_serde_shape() {
        let json = serde_json::to_string(&OverlapMetric::NgramJaccard { n: 4 }).unwrap();
        assert_eq!(json, r#"{"kind":"ngram_jaccard","n":4}"#);
        let lcs: OverlapMetric = serde_json::from_str(r#"{"kind":"lcs"}"#).unwrap();
        assert_eq!(lcs, OverlapMetric::Lcs);
    }
}
