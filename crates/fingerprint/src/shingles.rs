//! K-gram hashing and winnowing.
//!
//! Both passes are O(n) in the number of tokens. The winnower is an explicit
//! stateful scan: a monotonic deque of candidate positions plus the position
//! selected by the previous window.

use std::collections::VecDeque;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::fingerprint::Fingerprint;

/// Rolling hash of every k-gram over `tokens`.
///
/// Each token is hashed with xxh3 first, then combined with a seeded
/// polynomial hash updated in O(1) per step. Returns `n - k + 1` hashes, or
/// nothing when `k == 0` or `n < k`.
pub fn kgram_hashes<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> Vec<u64> {
    let n = tokens.len();
    if k == 0 || n < k {
        return Vec::new();
    }
    let th: Vec<u64> = tokens
        .iter()
        .map(|t| xxh3_64_with_seed(t.as_ref().as_bytes(), seed))
        .collect();

    const BASE: u64 = 1_000_003;
    let base = BASE ^ splitmix64(seed);

    // base^(k-1), used to drop the oldest token from the window.
    let base_km1 = (1..k).fold(1u64, |acc, _| acc.wrapping_mul(base));

    let mut out = Vec::with_capacity(n - k + 1);
    // Hash of the first window: h = t0*B^(k-1) + t1*B^(k-2) + ... + t(k-1).
    let mut h = th
        .iter()
        .take(k)
        .fold(0u64, |acc, &val| acc.wrapping_mul(base).wrapping_add(val));
    out.push(h);

    // Slide by one: remove the outgoing token's term, shift, add the new one.
    // All arithmetic wraps mod 2^64.
    for (&old, &new) in th.iter().zip(th.iter().skip(k)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(base).wrapping_add(new);
        out.push(h);
    }
    out
}

/// Select fingerprints from k-gram hashes by winnowing.
///
/// Every window of `w` consecutive hashes contributes its minimum, rightmost
/// on ties. A position chosen by the previous window is not emitted again.
/// With fewer than `w` hashes the single global (rightmost) minimum is
/// returned.
pub fn winnow(hashes: &[u64], w: usize) -> Vec<Fingerprint> {
    let n = hashes.len();
    if n == 0 {
        return Vec::new();
    }

    // A zero window is treated as one.
    let window = w.max(1);
    // Not enough hashes for a full window: one global minimum. `<=` lets a
    // later equal value replace the current best, so the rightmost wins.
    if window >= n {
        let (position, &hash) = hashes
            .iter()
            .enumerate()
            .fold((0, &hashes[0]), |best, (idx, val)| {
                if val <= best.1 {
                    (idx, val)
                } else {
                    best
                }
            });
        return vec![Fingerprint { hash, position }];
    }

    let mut out = Vec::with_capacity(n - window + 1);
    // Front is the current window minimum; values increase strictly towards
    // the back.
    let mut dq: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last_picked: Option<usize> = None;

    for i in 0..n {
        // Drop back entries greater than or equal to the new hash. Popping
        // on equality discards the older of two equal minima, which is what
        // makes ties resolve to the rightmost position.
        while let Some(&j) = dq.back() {
            if hashes[i] <= hashes[j] {
                dq.pop_back();
            } else {
                break;
            }
        }
        dq.push_back(i);

        if i + 1 < window {
            continue;
        }
        // Window covers [left, i]; evict positions that slid out the front.
        let left = i + 1 - window;
        while let Some(&j) = dq.front() {
            if j < left {
                dq.pop_front();
            } else {
                break;
            }
        }

        // Consecutive windows often share a minimum; record it once.
        if let Some(&idx) = dq.front() {
            if last_picked != Some(idx) {
                out.push(Fingerprint {
                    hash: hashes[idx],
                    position: idx,
                });
                last_picked = Some(idx);
            }
        }
    }
    out
}

pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
